pub mod account_dto;
pub mod common_dto;
pub mod config_dto;
pub mod loan_dto;
pub mod payment_method_dto;
pub mod upload_dto;
pub mod withdrawal_dto;

pub use account_dto::*;
pub use common_dto::*;
pub use config_dto::*;
pub use loan_dto::*;
pub use payment_method_dto::*;
pub use upload_dto::*;
pub use withdrawal_dto::*;
