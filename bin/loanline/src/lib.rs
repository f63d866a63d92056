mod observability;

pub mod utility;

pub use loanline_primitives::error::ApiError;

use crate::utility::db_pool::{create_db_pool, run_migrations};
use crate::utility::logging::setup_logging;
use crate::utility::server::serve;
use crate::utility::tasks::{build_router, load_env};
use eyre::Report;
use loanline_core::app_state::AppState;
use loanline_primitives::models::app_state::app_config::AppConfig;
use tracing::info;

pub async fn run() -> Result<(), Report> {
    // 1. load environment variables
    load_env();

    // 2. initialize logging first (so we can log everything else)
    setup_logging();

    info!("Starting Loanline application...");

    // 3. load configuration
    let config = AppConfig::from_env()?;

    // 4. create database connection pool and bring the schema up to date
    let pool = create_db_pool()?;
    run_migrations(&pool)?;

    // 5. build application state
    let state = AppState::new(pool, config)?;

    // 6. initialize metrics
    let (metric_layer, metric_handle) = observability::metrics::setup_metrics();

    // 7. build axum router
    let app = build_router(state, metric_layer, metric_handle)?;

    // 8. start HTTP server
    serve(app).await?;

    info!("Loanline application shut down gracefully");
    Ok(())
}
