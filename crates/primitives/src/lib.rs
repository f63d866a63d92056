pub mod error;
pub mod lending;
pub mod models;
pub mod schema;
