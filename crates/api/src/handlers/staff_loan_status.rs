use axum::extract::{Path, State};
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::loan_service::LoanService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::loan_dto::{LoanResponse, StaffLoanStatusRequest};
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/staff/loans/{loan_id}/status",
    tag = "Staff",
    summary = "Change a loan's status",
    description = "Quick status change from the staff list. Same transition rules as the full edit: \
                   the first approval credits the account once, later approvals credit nothing.",
    operation_id = "staffSetLoanStatus",
    params(
        ("loan_id" = Uuid, Path, description = "Loan application id"),
    ),
    request_body(
        content = StaffLoanStatusRequest,
        description = "Target status, e.g. `{ \"status\": \"APPROVED\" }`",
    ),
    responses(
        ( status = 200, description = "Updated application", body = LoanResponse),
        ( status = 400, description = "Unknown status", body = ApiErrorResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
        ( status = 403, description = "Forbidden: staff only", body = ApiErrorResponse),
        ( status = 404, description = "Loan not found", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn staff_loan_status(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(loan_id): Path<Uuid>,
    Json(req): Json<StaffLoanStatusRequest>,
) -> Result<Json<LoanResponse>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(
        LoanService::staff_set_status(&state, &ctx, loan_id, req).await?,
    ))
}
