use crate::handlers::multipart::{FormParts, StaffLoanMultipart};
use axum::extract::{Multipart, Path, State};
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::loan_service::LoanService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::loan_dto::LoanResponse;
use std::sync::Arc;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/staff/loans/{loan_id}",
    tag = "Staff",
    summary = "Edit a loan application",
    description = "Staff edit of a loan application's profile, amount, term, rate, images, phone and status. \
                   Blank fields are left unchanged. The loan row and its owner's account row are locked for the whole \
                   edit, and any invalid field rejects the request without persisting anything. \
                   The monthly repayment is always recomputed. \
                   The first transition into APPROVED credits the loan amount to the account balance exactly once; \
                   leaving APPROVED follows the configured reversal policy.",
    operation_id = "staffUpdateLoan",
    params(
        ("loan_id" = Uuid, Path, description = "Loan application id"),
    ),
    request_body(
        content = StaffLoanMultipart,
        content_type = "multipart/form-data",
        description = "Fields to change; omit or leave blank to keep the current value.",
    ),
    responses(
        ( status = 200, description = "Updated application", body = LoanResponse),
        ( status = 400, description = "Bad request: a field failed validation; nothing was saved", body = ApiErrorResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
        ( status = 403, description = "Forbidden: staff only", body = ApiErrorResponse),
        ( status = 404, description = "Loan not found", body = ApiErrorResponse),
        ( status = 409, description = "Conflict: the new phone number belongs to another account", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn staff_update_loan(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(loan_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<LoanResponse>, ApiError> {
    let ctx = claims.context()?;
    let update = FormParts::collect(multipart).await?.into_staff_update();

    Ok(Json(
        LoanService::staff_update(&state, &ctx, loan_id, update).await?,
    ))
}
