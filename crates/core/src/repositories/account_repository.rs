use chrono::{DateTime, Utc};
use diesel::prelude::*;
use loanline_primitives::error::ApiError;
use loanline_primitives::models::entities::account::{Account, AccountChangeset, NewAccount};
use loanline_primitives::schema::accounts;
use rust_decimal::Decimal;
use uuid::Uuid;

pub struct AccountRepository;

impl AccountRepository {
    pub fn find_by_id(conn: &mut PgConnection, account_id: Uuid) -> Result<Option<Account>, ApiError> {
        accounts::table
            .find(account_id)
            .select(Account::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn get(conn: &mut PgConnection, account_id: Uuid) -> Result<Account, ApiError> {
        Self::find_by_id(conn, account_id)?
            .ok_or_else(|| ApiError::NotFound("Account not found".into()))
    }

    /// Locks the account row until the surrounding transaction ends.
    pub fn find_by_id_for_update(
        conn: &mut PgConnection,
        account_id: Uuid,
    ) -> Result<Account, ApiError> {
        accounts::table
            .find(account_id)
            .select(Account::as_select())
            .for_update()
            .first(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ApiError::NotFound("Account not found".into()),
                other => ApiError::from(other),
            })
    }

    pub fn find_by_phone(conn: &mut PgConnection, phone: &str) -> Result<Option<Account>, ApiError> {
        accounts::table
            .filter(accounts::phone.eq(phone))
            .select(Account::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn create(conn: &mut PgConnection, new_account: NewAccount) -> Result<Account, ApiError> {
        diesel::insert_into(accounts::table)
            .values(&new_account)
            .returning(Account::as_returning())
            .get_result(conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => ApiError::Conflict("Phone number already registered".into()),
                other => ApiError::from(other),
            })
    }

    pub fn set_balance(
        conn: &mut PgConnection,
        account_id: Uuid,
        balance: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        diesel::update(accounts::table.find(account_id))
            .set((accounts::balance.eq(balance), accounts::updated_at.eq(now)))
            .execute(conn)?;
        Ok(())
    }

    pub fn set_phone(
        conn: &mut PgConnection,
        account_id: Uuid,
        phone: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        diesel::update(accounts::table.find(account_id))
            .set((accounts::phone.eq(phone), accounts::updated_at.eq(now)))
            .execute(conn)?;
        Ok(())
    }

    pub fn update(
        conn: &mut PgConnection,
        account_id: Uuid,
        changes: &AccountChangeset,
    ) -> Result<Account, ApiError> {
        diesel::update(accounts::table.find(account_id))
            .set(changes)
            .returning(Account::as_returning())
            .get_result(conn)
            .map_err(ApiError::from)
    }
}
