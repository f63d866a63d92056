use axum::extract::{Path, State};
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::account_service::AccountService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::account_dto::{AccountResponse, StaffAccountUpdate};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/staff/accounts/{account_id}",
    tag = "Staff",
    summary = "Edit an account",
    description = "Updates account status, withdrawal OTP, credit score, activation and balance under a row lock. \
                   A balance change is journaled as a staff adjustment. Negative balances are refused.",
    operation_id = "staffUpdateAccount",
    params(
        ("account_id" = Uuid, Path, description = "Account id"),
    ),
    request_body(content = StaffAccountUpdate),
    responses(
        ( status = 200, description = "Updated account", body = AccountResponse),
        ( status = 400, description = "Validation failed", body = ApiErrorResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
        ( status = 403, description = "Forbidden: staff only", body = ApiErrorResponse),
        ( status = 404, description = "Account not found", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn staff_update_account(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(account_id): Path<Uuid>,
    Json(req): Json<StaffAccountUpdate>,
) -> Result<Json<AccountResponse>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(
        AccountService::staff_update(&state, &ctx, account_id, req).await?,
    ))
}
