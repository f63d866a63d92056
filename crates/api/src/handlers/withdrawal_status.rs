use axum::extract::State;
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::withdrawal_service::WithdrawalService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::withdrawal_dto::WithdrawalStatusResponse;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/withdrawals/status",
    tag = "Withdrawals",
    summary = "Latest withdrawal status",
    description = "Polled by the wallet page. Reports the newest withdrawal of the account, if any.",
    operation_id = "getWithdrawalStatus",
    responses(
        ( status = 200, description = "Latest withdrawal", body = WithdrawalStatusResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn withdrawal_status(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<WithdrawalStatusResponse>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(WithdrawalService::latest_status(&state, &ctx).await?))
}
