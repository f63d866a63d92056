use axum::extract::State;
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::payment_method_service::PaymentMethodService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::payment_method_dto::PaymentMethodResponse;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/payment_method",
    tag = "Payment Method",
    summary = "Get the payout channel",
    operation_id = "getPaymentMethod",
    responses(
        ( status = 200, description = "Saved payment method", body = PaymentMethodResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
        ( status = 404, description = "Nothing saved yet", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn payment_method(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<PaymentMethodResponse>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(PaymentMethodService::get(&state, &ctx).await?))
}
