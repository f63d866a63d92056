use axum::extract::{Path, State};
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::withdrawal_service::WithdrawalService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::withdrawal_dto::{StaffWithdrawalUpdate, WithdrawalResponse};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/staff/withdrawals/{withdrawal_id}",
    tag = "Staff",
    summary = "Edit a withdrawal",
    description = "Updates status, OTP requirement, staff OTP and refunded flag under a row lock. \
                   Moving to `rejected` or ticking `refunded` credits the amount back to the owner \
                   exactly once; the refunded flag never goes back to false.",
    operation_id = "staffUpdateWithdrawal",
    params(
        ("withdrawal_id" = Uuid, Path, description = "Withdrawal id"),
    ),
    request_body(content = StaffWithdrawalUpdate),
    responses(
        ( status = 200, description = "Updated withdrawal", body = WithdrawalResponse),
        ( status = 400, description = "Unknown status", body = ApiErrorResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
        ( status = 403, description = "Forbidden: staff only", body = ApiErrorResponse),
        ( status = 404, description = "Withdrawal not found", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn staff_update_withdrawal(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(withdrawal_id): Path<Uuid>,
    Json(req): Json<StaffWithdrawalUpdate>,
) -> Result<Json<WithdrawalResponse>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(
        WithdrawalService::staff_update(&state, &ctx, withdrawal_id, req).await?,
    ))
}
