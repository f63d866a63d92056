use crate::handlers::multipart::{FormParts, LoanApplicationMultipart};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::loan_service::LoanService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::loan_dto::LoanResponse;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/api/loans",
    tag = "Loans",
    summary = "Submit a loan application",
    description = "Creates a PENDING loan application for the authenticated account. \
                   The form must carry every profile field, the three identity images and a drawn signature \
                   encoded as `data:image/...;base64,...`. \
                   Checks run in order: blank text fields, missing images, signature shape, numeric parsing, \
                   allowed terms (6/12/24/36/48/60 months) and the configured amount bounds. \
                   The monthly interest rate is copied from the current loan configuration and never changes afterwards. \
                   An account may hold only one application that is not REJECTED.",
    operation_id = "submitLoanApplication",
    request_body(
        content = LoanApplicationMultipart,
        content_type = "multipart/form-data",
        description = "Applicant profile, requested amount and term, identity images and signature.",
    ),
    responses(
        ( status = 201, description = "Application stored with status PENDING", body = LoanResponse),
        ( status = 400, description = "Bad request: a required field is blank or out of range", body = ApiErrorResponse),
        ( status = 401, description = "Unauthorized: missing or invalid token", body = ApiErrorResponse),
        ( status = 409, description = "Conflict: the account already has an application in progress", body = ApiErrorResponse),
        ( status = 502, description = "Bad gateway: an uploaded image could not be processed", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn submit_loan(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    let ctx = claims.context()?;
    let form = FormParts::collect(multipart).await?.into_application();

    let loan = LoanService::submit(&state, &ctx, form).await?;

    Ok((StatusCode::CREATED, Json(loan)))
}
