use axum::extract::State;
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::loan_service::LoanService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::loan_dto::LoanResponse;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/loans/current",
    tag = "Loans",
    summary = "Get the current loan application",
    description = "Returns the most recent application of the authenticated account that is not REJECTED.",
    operation_id = "getCurrentLoan",
    responses(
        ( status = 200, description = "Current application", body = LoanResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
        ( status = 404, description = "No application in progress", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn current_loan(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<LoanResponse>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(LoanService::current(&state, &ctx).await?))
}
