use diesel::prelude::*;
use loanline_primitives::error::ApiError;
use loanline_primitives::models::entities::enum_types::WithdrawalStatus;
use loanline_primitives::models::entities::withdrawal::{NewWithdrawalRequest, WithdrawalRequest};
use loanline_primitives::schema::{accounts, withdrawal_requests};
use uuid::Uuid;

pub const HISTORY_LIMIT: i64 = 20;

pub struct WithdrawalRepository;

impl WithdrawalRepository {
    pub fn create(
        conn: &mut PgConnection,
        new_request: NewWithdrawalRequest,
    ) -> Result<WithdrawalRequest, ApiError> {
        diesel::insert_into(withdrawal_requests::table)
            .values(&new_request)
            .returning(WithdrawalRequest::as_returning())
            .get_result(conn)
            .map_err(ApiError::from)
    }

    pub fn find_open(
        conn: &mut PgConnection,
        account_id: Uuid,
    ) -> Result<Option<WithdrawalRequest>, ApiError> {
        withdrawal_requests::table
            .filter(withdrawal_requests::account_id.eq(account_id))
            .filter(withdrawal_requests::status.eq_any(WithdrawalStatus::OPEN))
            .order(withdrawal_requests::created_at.desc())
            .select(WithdrawalRequest::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn latest(
        conn: &mut PgConnection,
        account_id: Uuid,
    ) -> Result<Option<WithdrawalRequest>, ApiError> {
        withdrawal_requests::table
            .filter(withdrawal_requests::account_id.eq(account_id))
            .order(withdrawal_requests::created_at.desc())
            .select(WithdrawalRequest::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    /// Settled requests (paid or rejected), newest first.
    pub fn history(
        conn: &mut PgConnection,
        account_id: Uuid,
    ) -> Result<Vec<WithdrawalRequest>, ApiError> {
        withdrawal_requests::table
            .filter(withdrawal_requests::account_id.eq(account_id))
            .filter(
                withdrawal_requests::status
                    .eq_any([WithdrawalStatus::Paid, WithdrawalStatus::Rejected]),
            )
            .order(withdrawal_requests::created_at.desc())
            .limit(HISTORY_LIMIT)
            .select(WithdrawalRequest::as_select())
            .load(conn)
            .map_err(ApiError::from)
    }

    pub fn find_by_id_for_update(
        conn: &mut PgConnection,
        withdrawal_id: Uuid,
    ) -> Result<WithdrawalRequest, ApiError> {
        withdrawal_requests::table
            .find(withdrawal_id)
            .select(WithdrawalRequest::as_select())
            .for_update()
            .first(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ApiError::NotFound("Withdrawal request not found".into())
                }
                other => ApiError::from(other),
            })
    }

    pub fn save(
        conn: &mut PgConnection,
        request: &WithdrawalRequest,
    ) -> Result<WithdrawalRequest, ApiError> {
        diesel::update(withdrawal_requests::table.find(request.id))
            .set(request.changeset())
            .returning(WithdrawalRequest::as_returning())
            .get_result(conn)
            .map_err(ApiError::from)
    }

    pub fn list(
        conn: &mut PgConnection,
        status: Option<WithdrawalStatus>,
        phone_pattern: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<(WithdrawalRequest, String)>, i64), ApiError> {
        let mut query = withdrawal_requests::table
            .inner_join(accounts::table)
            .select((WithdrawalRequest::as_select(), accounts::phone))
            .into_boxed();
        let mut count = withdrawal_requests::table
            .inner_join(accounts::table)
            .select(diesel::dsl::count_star())
            .into_boxed();

        if let Some(status) = status {
            query = query.filter(withdrawal_requests::status.eq(status));
            count = count.filter(withdrawal_requests::status.eq(status));
        }
        if let Some(pattern) = phone_pattern {
            query = query.filter(accounts::phone.like(pattern.to_string()));
            count = count.filter(accounts::phone.like(pattern.to_string()));
        }

        let rows = query
            .order(withdrawal_requests::created_at.desc())
            .offset(offset)
            .limit(limit)
            .load::<(WithdrawalRequest, String)>(conn)?;
        let total = count.first::<i64>(conn)?;

        Ok((rows, total))
    }
}
