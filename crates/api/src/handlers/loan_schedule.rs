use axum::extract::State;
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::loan_service::LoanService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::loan_dto::RepaymentScheduleResponse;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/loans/schedule",
    tag = "Loans",
    summary = "Repayment schedule of the approved loan",
    description = "Projects one installment per month of the term for the latest APPROVED loan. \
                   The first installment falls 15 days after approval and each following one a calendar month later, \
                   clamped to the end of shorter months. Nothing is persisted.",
    operation_id = "getRepaymentSchedule",
    responses(
        ( status = 200, description = "Installment projection", body = RepaymentScheduleResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
        ( status = 404, description = "No approved loan", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn loan_schedule(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<RepaymentScheduleResponse>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(LoanService::schedule(&state, &ctx).await?))
}
