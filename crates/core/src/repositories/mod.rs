pub mod account_repository;
pub mod ledger_repository;
pub mod loan_config_repository;
pub mod loan_repository;
pub mod payment_method_repository;
pub mod withdrawal_repository;
