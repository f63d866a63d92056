use diesel::prelude::*;
use loanline_primitives::error::ApiError;
use loanline_primitives::models::entities::loan_config::{LoanConfig, LoanConfigRow, LOAN_CONFIG_ID};
use loanline_primitives::schema::loan_configs;

pub struct LoanConfigRepository;

impl LoanConfigRepository {
    pub fn get(conn: &mut PgConnection) -> Result<Option<LoanConfig>, ApiError> {
        loan_configs::table
            .find(LOAN_CONFIG_ID)
            .select(LoanConfig::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn upsert(conn: &mut PgConnection, row: LoanConfigRow) -> Result<LoanConfig, ApiError> {
        diesel::insert_into(loan_configs::table)
            .values(&row)
            .on_conflict(loan_configs::id)
            .do_update()
            .set(&row)
            .returning(LoanConfig::as_returning())
            .get_result(conn)
            .map_err(ApiError::from)
    }
}
