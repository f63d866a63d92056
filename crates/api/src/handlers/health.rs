use axum::{extract::State, http::StatusCode, Json};
use diesel::prelude::*;
use loanline_core::app_state::AppState;
use loanline_primitives::models::dtos::common_dto::HealthStatus;
use std::sync::Arc;
use tracing::error;

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    summary = "Health check endpoint",
    description = "Returns the operational status of the service. \
                   The database is probed with a trivial query; when it cannot be reached the body reports \
                   `503 Service Unavailable` in its `status` field. \
                   This endpoint is **public** (no authentication required).",
    operation_id = "healthCheck",
    responses(
        ( status = 200, description = "Service status report", body = HealthStatus),
    ),
    security(()),
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    let mut conn = match state.db.get() {
        Ok(conn) => conn,
        Err(e) => {
            error!("Health check DB connection failed: {}", e);
            return Json(HealthStatus {
                status: StatusCode::SERVICE_UNAVAILABLE.to_string(),
                message: "Health check DB connection failed".to_string(),
            });
        }
    };

    match diesel::sql_query("SELECT 1").execute(&mut conn) {
        Ok(_) => Json(HealthStatus {
            status: StatusCode::OK.to_string(),
            message: "API is healthy".to_string(),
        }),
        Err(e) => {
            error!("Health check DB query failed: {}", e);
            Json(HealthStatus {
                status: StatusCode::SERVICE_UNAVAILABLE.to_string(),
                message: "Health check DB query failed".to_string(),
            })
        }
    }
}
