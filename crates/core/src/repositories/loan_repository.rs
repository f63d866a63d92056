use diesel::prelude::*;
use loanline_primitives::error::ApiError;
use loanline_primitives::models::entities::enum_types::LoanStatus;
use loanline_primitives::models::entities::loan::{LoanApplication, NewLoanApplication};
use loanline_primitives::schema::{accounts, loan_applications};
use uuid::Uuid;

pub struct LoanRepository;

impl LoanRepository {
    pub fn create(
        conn: &mut PgConnection,
        new_loan: NewLoanApplication,
    ) -> Result<LoanApplication, ApiError> {
        diesel::insert_into(loan_applications::table)
            .values(&new_loan)
            .returning(LoanApplication::as_returning())
            .get_result(conn)
            .map_err(ApiError::from)
    }

    pub fn find_by_id_for_update(
        conn: &mut PgConnection,
        loan_id: Uuid,
    ) -> Result<LoanApplication, ApiError> {
        loan_applications::table
            .find(loan_id)
            .select(LoanApplication::as_select())
            .for_update()
            .first(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ApiError::NotFound("Loan not found".into()),
                other => ApiError::from(other),
            })
    }

    /// Latest application that still blocks a new submission.
    pub fn find_outstanding(
        conn: &mut PgConnection,
        account_id: Uuid,
    ) -> Result<Option<LoanApplication>, ApiError> {
        loan_applications::table
            .filter(loan_applications::account_id.eq(account_id))
            .filter(loan_applications::status.ne(LoanStatus::Rejected))
            .order(loan_applications::created_at.desc())
            .select(LoanApplication::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn latest(
        conn: &mut PgConnection,
        account_id: Uuid,
    ) -> Result<Option<LoanApplication>, ApiError> {
        loan_applications::table
            .filter(loan_applications::account_id.eq(account_id))
            .order(loan_applications::created_at.desc())
            .select(LoanApplication::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn latest_approved(
        conn: &mut PgConnection,
        account_id: Uuid,
    ) -> Result<Option<LoanApplication>, ApiError> {
        loan_applications::table
            .filter(loan_applications::account_id.eq(account_id))
            .filter(loan_applications::status.eq(LoanStatus::Approved))
            .order(loan_applications::created_at.desc())
            .select(LoanApplication::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn save(conn: &mut PgConnection, loan: &LoanApplication) -> Result<LoanApplication, ApiError> {
        diesel::update(loan_applications::table.find(loan.id))
            .set(loan.changeset())
            .returning(LoanApplication::as_returning())
            .get_result(conn)
            .map_err(ApiError::from)
    }

    /// Staff listing, newest first, joined with the owner's phone.
    pub fn list(
        conn: &mut PgConnection,
        status: Option<LoanStatus>,
        phone_pattern: Option<&str>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<(LoanApplication, String)>, i64), ApiError> {
        let mut query = loan_applications::table
            .inner_join(accounts::table)
            .select((LoanApplication::as_select(), accounts::phone))
            .into_boxed();
        let mut count = loan_applications::table
            .inner_join(accounts::table)
            .select(diesel::dsl::count_star())
            .into_boxed();

        if let Some(status) = status {
            query = query.filter(loan_applications::status.eq(status));
            count = count.filter(loan_applications::status.eq(status));
        }
        if let Some(pattern) = phone_pattern {
            query = query.filter(accounts::phone.like(pattern.to_string()));
            count = count.filter(accounts::phone.like(pattern.to_string()));
        }

        let rows = query
            .order(loan_applications::created_at.desc())
            .offset(offset)
            .limit(limit)
            .load::<(LoanApplication, String)>(conn)?;
        let total = count.first::<i64>(conn)?;

        Ok((rows, total))
    }
}
