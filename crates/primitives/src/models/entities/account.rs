use crate::models::entities::enum_types::AccountStatus;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Serialize)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    pub id: Uuid,
    pub phone: String,
    pub balance: Decimal,
    pub account_status: AccountStatus,
    pub status_message: String,
    #[serde(skip_serializing)]
    pub withdraw_otp: String,
    pub credit_score: i32,
    pub is_staff: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// OTP staff handed to the customer for withdrawals, if one is set.
    pub fn staff_otp(&self) -> Option<&str> {
        let otp = self.withdraw_otp.trim();
        (!otp.is_empty()).then_some(otp)
    }

    pub fn can_withdraw(&self) -> bool {
        self.account_status == AccountStatus::Active
    }

    /// Status message for the customer, falling back to a canned notice.
    pub fn notice(&self) -> String {
        let msg = self.status_message.trim();
        if msg.is_empty() {
            self.account_status.default_notice().to_string()
        } else {
            msg.to_string()
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::accounts)]
pub struct NewAccount<'a> {
    pub phone: &'a str,
    pub balance: Decimal,
    pub account_status: AccountStatus,
    pub withdraw_otp: &'a str,
    pub credit_score: i32,
    pub is_staff: bool,
}

/// Staff edits; `None` leaves the column untouched.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = crate::schema::accounts)]
pub struct AccountChangeset {
    pub account_status: Option<AccountStatus>,
    pub status_message: Option<String>,
    pub withdraw_otp: Option<String>,
    pub credit_score: Option<i32>,
    pub is_active: Option<bool>,
    pub balance: Option<Decimal>,
    pub updated_at: Option<DateTime<Utc>>,
}
