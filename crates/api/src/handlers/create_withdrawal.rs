use axum::extract::State;
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::withdrawal_service::WithdrawalService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::withdrawal_dto::{CreateWithdrawalRequest, WithdrawalOutcome};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/withdrawals",
    tag = "Withdrawals",
    summary = "Request a withdrawal",
    description = "Debits the requested amount from the account balance and opens a withdrawal in `processing`. \
                   The account row is locked for the whole check-and-debit. Checks run in order: \
                   account status must allow withdrawals, the staff-issued OTP must be supplied and match, \
                   an already open withdrawal short-circuits with `already: true` and no debit, \
                   the balance must be positive, the amount must parse as a positive number and must not exceed the balance. \
                   Refusals carry a machine-readable `error` code: `account_not_active`, `otp_required`, `otp_wrong`, \
                   `insufficient`, `amount_required`, `invalid_amount`, `exceed`.",
    operation_id = "createWithdrawal",
    request_body(
        content = CreateWithdrawalRequest,
        description = "Amount and OTP. Example: `{ \"amount\": \"5000\", \"otp\": \"123456\" }`",
    ),
    responses(
        ( status = 200, description = "Withdrawal opened, or an open one already exists", body = WithdrawalOutcome),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
        ( status = 422, description = "Withdrawal refused; see the `error` code", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn create_withdrawal(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateWithdrawalRequest>,
) -> Result<Json<WithdrawalOutcome>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(WithdrawalService::create(&state, &ctx, req).await?))
}
