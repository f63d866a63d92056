use axum::extract::State;
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::payment_method_service::PaymentMethodService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::payment_method_dto::{
    PaymentMethodResponse, SavePaymentMethodRequest,
};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/payment_method",
    tag = "Payment Method",
    summary = "Save the payout channel",
    description = "Stores exactly one payout channel: bank (name and account number), e-wallet (name and phone) \
                   or PayPal (e-mail). The method is locked once saved; further changes go through staff.",
    operation_id = "savePaymentMethod",
    request_body(content = SavePaymentMethodRequest),
    responses(
        ( status = 200, description = "Saved and locked", body = PaymentMethodResponse),
        ( status = 400, description = "Zero or several channels filled, or a channel is incomplete", body = ApiErrorResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
        ( status = 409, description = "Payment method already locked", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn save_payment_method(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SavePaymentMethodRequest>,
) -> Result<Json<PaymentMethodResponse>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(PaymentMethodService::save(&state, &ctx, req).await?))
}
