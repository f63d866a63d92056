use axum::extract::State;
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::loan_config_service::LoanConfigService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::config_dto::{LoanConfigResponse, UpdateLoanConfigRequest};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/staff/loan_config",
    tag = "Staff",
    summary = "Current loan configuration",
    description = "Monthly interest rate and amount bounds applied to new applications. \
                   Defaults are reported when no configuration has been saved.",
    operation_id = "getLoanConfig",
    responses(
        ( status = 200, description = "Loan configuration", body = LoanConfigResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
        ( status = 403, description = "Forbidden: staff only", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn get_loan_config(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<LoanConfigResponse>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(LoanConfigService::current(&state, &ctx).await?))
}

#[utoipa::path(
    put,
    path = "/api/staff/loan_config",
    tag = "Staff",
    summary = "Update the loan configuration",
    description = "Replaces the singleton configuration. Existing applications keep the rate they were priced with.",
    operation_id = "updateLoanConfig",
    request_body(
        content = UpdateLoanConfigRequest,
        description = "Example: `{ \"interest_rate_monthly\": \"0.0003\", \"min_amount\": \"200000\", \"max_amount\": \"60000000\" }`",
    ),
    responses(
        ( status = 200, description = "Saved configuration", body = LoanConfigResponse),
        ( status = 400, description = "Unparseable value, negative rate or min above max", body = ApiErrorResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
        ( status = 403, description = "Forbidden: staff only", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn update_loan_config(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateLoanConfigRequest>,
) -> Result<Json<LoanConfigResponse>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(LoanConfigService::update(&state, &ctx, req).await?))
}
