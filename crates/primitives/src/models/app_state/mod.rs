pub mod app_config;
pub mod jwt_details;
pub mod lending_details;
pub mod media_details;

pub use app_config::*;
pub use jwt_details::*;
pub use lending_details::*;
pub use media_details::*;
