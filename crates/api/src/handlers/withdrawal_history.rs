use axum::extract::State;
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::withdrawal_service::WithdrawalService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::withdrawal_dto::WithdrawalHistoryResponse;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/withdrawals/history",
    tag = "Withdrawals",
    summary = "Recent withdrawals",
    description = "The 20 most recent settled withdrawals (paid or rejected) of the account, newest first.",
    operation_id = "getWithdrawalHistory",
    responses(
        ( status = 200, description = "Withdrawal history", body = WithdrawalHistoryResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn withdrawal_history(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<WithdrawalHistoryResponse>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(WithdrawalService::history(&state, &ctx).await?))
}
