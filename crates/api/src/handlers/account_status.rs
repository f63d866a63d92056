use axum::extract::State;
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::account_service::AccountService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::account_dto::AccountStatusResponse;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/account/status",
    tag = "Account",
    summary = "Account status",
    operation_id = "getAccountStatus",
    responses(
        ( status = 200, description = "Status and notice", body = AccountStatusResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn account_status(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<AccountStatusResponse>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(AccountService::status(&state, &ctx).await?))
}
