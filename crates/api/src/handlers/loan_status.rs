use axum::extract::State;
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::loan_service::LoanService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::loan_dto::LoanStatusView;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/loans/status",
    tag = "Loans",
    summary = "Customer-facing loan status",
    description = "Reports the status the customer should see for their latest application. \
                   A PENDING application older than the configured review window is shown as REVIEW. \
                   Nothing is shown (`visible` false) until the account has a locked payment method and at least one application.",
    operation_id = "getLoanStatus",
    responses(
        ( status = 200, description = "Status view", body = LoanStatusView),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn loan_status(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<LoanStatusView>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(LoanService::status_view(&state, &ctx).await?))
}
