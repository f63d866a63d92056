use axum::extract::State;
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::account_service::AccountService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::account_dto::RealtimeState;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/account/state",
    tag = "Account",
    summary = "Realtime account state",
    description = "Balance, account status with its notice text, whether a withdrawal OTP is required, \
                   and a snapshot of the latest withdrawal. Polled by the customer pages.",
    operation_id = "getAccountState",
    responses(
        ( status = 200, description = "Current account state", body = RealtimeState),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn account_state(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<RealtimeState>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(AccountService::realtime_state(&state, &ctx).await?))
}
