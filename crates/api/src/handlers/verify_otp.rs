use axum::extract::State;
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::withdrawal_service::WithdrawalService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::withdrawal_dto::{OtpCheckResponse, VerifyOtpRequest};
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/withdrawals/verify_otp",
    tag = "Withdrawals",
    summary = "Check a withdrawal OTP",
    description = "Compares the supplied code with the one staff issued for the account. Creates nothing.",
    operation_id = "verifyWithdrawalOtp",
    request_body(content = VerifyOtpRequest),
    responses(
        ( status = 200, description = "Code matches", body = OtpCheckResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
        ( status = 422, description = "`otp_required` or `otp_wrong`", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<OtpCheckResponse>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(WithdrawalService::verify_otp(&state, &ctx, req).await?))
}
