pub mod account;
pub mod balance_ledger;
pub mod enum_types;
pub mod loan;
pub mod loan_config;
pub mod payment_method;
pub mod withdrawal;

pub use account::*;
pub use balance_ledger::*;
pub use enum_types::*;
pub use loan::*;
pub use loan_config::*;
pub use payment_method::*;
pub use withdrawal::*;
