use diesel::prelude::*;
use loanline_primitives::error::ApiError;
use loanline_primitives::models::entities::balance_ledger::{
    BalanceLedgerEntry, NewBalanceLedgerEntry,
};
use loanline_primitives::schema::balance_ledger;
use uuid::Uuid;

pub struct LedgerRepository;

impl LedgerRepository {
    pub fn append(conn: &mut PgConnection, entry: NewBalanceLedgerEntry) -> Result<(), ApiError> {
        diesel::insert_into(balance_ledger::table)
            .values(&entry)
            .execute(conn)?;
        Ok(())
    }

    pub fn for_account(
        conn: &mut PgConnection,
        account_id: Uuid,
    ) -> Result<Vec<BalanceLedgerEntry>, ApiError> {
        balance_ledger::table
            .filter(balance_ledger::account_id.eq(account_id))
            .order(balance_ledger::created_at.asc())
            .select(BalanceLedgerEntry::as_select())
            .load(conn)
            .map_err(ApiError::from)
    }
}
