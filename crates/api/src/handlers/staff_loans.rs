use axum::extract::{Query, State};
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::loan_service::LoanService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::common_dto::{ListQuery, Page};
use loanline_primitives::models::dtos::loan_dto::StaffLoanRow;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/staff/loans",
    tag = "Staff",
    summary = "List loan applications",
    description = "Newest first, 20 per page. Filter by exact status and by a phone number substring.",
    operation_id = "staffListLoans",
    params(ListQuery),
    responses(
        ( status = 200, description = "Page of applications", body = Page<StaffLoanRow>),
        ( status = 400, description = "Unknown status filter", body = ApiErrorResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
        ( status = 403, description = "Forbidden: staff only", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn staff_loans(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<StaffLoanRow>>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(LoanService::staff_list(&state, &ctx, query).await?))
}
