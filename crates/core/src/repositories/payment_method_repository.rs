use chrono::{DateTime, Utc};
use diesel::prelude::*;
use loanline_primitives::error::ApiError;
use loanline_primitives::models::entities::payment_method::{
    NewPaymentMethod, PaymentMethod, PayoutDetails,
};
use loanline_primitives::schema::payment_methods;
use uuid::Uuid;

pub struct PaymentMethodRepository;

impl PaymentMethodRepository {
    pub fn find_by_account(
        conn: &mut PgConnection,
        account_id: Uuid,
    ) -> Result<Option<PaymentMethod>, ApiError> {
        payment_methods::table
            .filter(payment_methods::account_id.eq(account_id))
            .select(PaymentMethod::as_select())
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn find_by_account_for_update(
        conn: &mut PgConnection,
        account_id: Uuid,
    ) -> Result<Option<PaymentMethod>, ApiError> {
        payment_methods::table
            .filter(payment_methods::account_id.eq(account_id))
            .select(PaymentMethod::as_select())
            .for_update()
            .first(conn)
            .optional()
            .map_err(ApiError::from)
    }

    pub fn is_locked(conn: &mut PgConnection, account_id: Uuid) -> Result<bool, ApiError> {
        Ok(Self::find_by_account(conn, account_id)?.is_some_and(|pm| pm.locked))
    }

    pub fn create(
        conn: &mut PgConnection,
        new_method: NewPaymentMethod,
    ) -> Result<PaymentMethod, ApiError> {
        diesel::insert_into(payment_methods::table)
            .values(&new_method)
            .returning(PaymentMethod::as_returning())
            .get_result(conn)
            .map_err(|e| match e {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => ApiError::Conflict("Payment method already saved".into()),
                other => ApiError::from(other),
            })
    }

    pub fn update(
        conn: &mut PgConnection,
        id: Uuid,
        details: &PayoutDetails,
        locked: bool,
        now: DateTime<Utc>,
    ) -> Result<PaymentMethod, ApiError> {
        diesel::update(payment_methods::table.find(id))
            .set((
                details,
                payment_methods::locked.eq(locked),
                payment_methods::updated_at.eq(now),
            ))
            .returning(PaymentMethod::as_returning())
            .get_result(conn)
            .map_err(ApiError::from)
    }
}
