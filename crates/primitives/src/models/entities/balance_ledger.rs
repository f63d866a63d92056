use crate::models::entities::enum_types::LedgerReason;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// One signed balance movement. Credits are positive, debits negative.
#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = crate::schema::balance_ledger)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BalanceLedgerEntry {
    pub id: Uuid,
    pub account_id: Uuid,
    pub amount: Decimal,
    pub reason: LedgerReason,
    pub reference_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::balance_ledger)]
pub struct NewBalanceLedgerEntry {
    pub account_id: Uuid,
    pub amount: Decimal,
    pub reason: LedgerReason,
    pub reference_id: Option<Uuid>,
}
