pub mod account_service;
pub mod ledger_service;
pub mod loan_config_service;
pub mod loan_service;
pub mod payment_method_service;
pub mod withdrawal_service;
