use axum::extract::{Path, State};
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::payment_method_service::PaymentMethodService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::payment_method_dto::{
    PaymentMethodResponse, StaffPaymentMethodUpdate,
};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/staff/payment_methods/{account_id}",
    tag = "Staff",
    summary = "Edit an account's payment method",
    description = "Staff may overwrite any field and the locked flag. Creates the record when the account has none. \
                   Only the PayPal e-mail format is validated.",
    operation_id = "staffUpdatePaymentMethod",
    params(
        ("account_id" = Uuid, Path, description = "Owning account id"),
    ),
    request_body(content = StaffPaymentMethodUpdate),
    responses(
        ( status = 200, description = "Updated payment method", body = PaymentMethodResponse),
        ( status = 400, description = "Invalid PayPal e-mail", body = ApiErrorResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
        ( status = 403, description = "Forbidden: staff only", body = ApiErrorResponse),
        ( status = 404, description = "Account not found", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn staff_update_payment_method(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(account_id): Path<Uuid>,
    Json(req): Json<StaffPaymentMethodUpdate>,
) -> Result<Json<PaymentMethodResponse>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(
        PaymentMethodService::staff_update(&state, &ctx, account_id, req).await?,
    ))
}
