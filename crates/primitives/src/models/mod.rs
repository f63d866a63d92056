pub mod app_state;
pub mod context;
pub mod dtos;
pub mod entities;

// Re-export commonly used types
pub use app_state::*;
pub use context::*;
pub use dtos::*;
pub use entities::*;
