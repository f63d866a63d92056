use axum::extract::{Query, State};
use axum::{Extension, Json};
use loanline_core::app_state::AppState;
use loanline_core::security::Claims;
use loanline_core::services::withdrawal_service::WithdrawalService;
use loanline_primitives::error::{ApiError, ApiErrorResponse};
use loanline_primitives::models::dtos::common_dto::{ListQuery, Page};
use loanline_primitives::models::dtos::withdrawal_dto::StaffWithdrawalRow;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/staff/withdrawals",
    tag = "Staff",
    summary = "List withdrawals",
    description = "Newest first, 20 per page. Filter by status and by a phone number substring.",
    operation_id = "staffListWithdrawals",
    params(ListQuery),
    responses(
        ( status = 200, description = "Page of withdrawals", body = Page<StaffWithdrawalRow>),
        ( status = 400, description = "Unknown status filter", body = ApiErrorResponse),
        ( status = 401, description = "Unauthorized", body = ApiErrorResponse),
        ( status = 403, description = "Forbidden: staff only", body = ApiErrorResponse),
    ),
    security(("bearerAuth" = [])),
)]
pub async fn staff_withdrawals(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<StaffWithdrawalRow>>, ApiError> {
    let ctx = claims.context()?;
    Ok(Json(WithdrawalService::staff_list(&state, &ctx, query).await?))
}
