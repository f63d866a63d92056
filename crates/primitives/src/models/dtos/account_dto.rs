use crate::error::ApiError;
use crate::lending::parse_money;
use crate::models::entities::account::{Account, AccountChangeset};
use crate::models::entities::enum_types::{AccountStatus, WithdrawalStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, ToSchema)]
pub struct WithdrawalSnapshot {
    pub id: Uuid,
    pub status: WithdrawalStatus,
    pub status_label: String,
    pub updated_at: DateTime<Utc>,
}

/// Polled by the wallet page. `balance` is a decimal string and
/// `account_status` is lowercase.
#[derive(Debug, Serialize, ToSchema)]
pub struct RealtimeState {
    pub ok: bool,
    #[schema(example = "active")]
    pub account_status: String,
    pub status_message: String,
    #[schema(value_type = String, example = "1000.00")]
    pub balance: Decimal,
    pub otp_required: bool,
    pub withdrawal: Option<WithdrawalSnapshot>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountStatusResponse {
    pub status: AccountStatus,
    pub status_label: String,
    pub message: String,
    #[schema(value_type = String)]
    pub balance: Decimal,
}

impl From<&Account> for AccountStatusResponse {
    fn from(account: &Account) -> Self {
        Self {
            status: account.account_status,
            status_label: account.account_status.label(),
            message: account.notice(),
            balance: account.balance,
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct StaffAccountUpdate {
    #[schema(example = "FROZEN")]
    pub account_status: Option<String>,
    pub status_message: Option<String>,
    pub withdraw_otp: Option<String>,
    pub is_active: Option<bool>,
    #[validate(range(min = 0, max = 1000))]
    pub credit_score: Option<i32>,
    #[schema(example = "2500.00")]
    pub balance: Option<String>,
}

/// Parsed staff edit. `balance`, when set, replaces the stored balance and is
/// journaled as an adjustment of the difference.
#[derive(Debug, Default)]
pub struct AccountEdit {
    pub changes: AccountChangeset,
    pub balance: Option<Decimal>,
}

impl StaffAccountUpdate {
    pub fn into_edit(self) -> Result<AccountEdit, ApiError> {
        self.validate()?;

        let account_status = self
            .account_status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(AccountStatus::parse)
            .transpose()?;

        let balance = self
            .balance
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|b| parse_money(b, "balance"))
            .transpose()?;
        if balance.is_some_and(|b| b < Decimal::ZERO) {
            return Err(ApiError::Invalid("Balance must not be negative".into()));
        }

        Ok(AccountEdit {
            changes: AccountChangeset {
                account_status,
                status_message: self.status_message.map(|m| m.trim().to_string()),
                withdraw_otp: self.withdraw_otp.map(|o| o.trim().to_string()),
                credit_score: self.credit_score,
                is_active: self.is_active,
                balance: None,
                updated_at: None,
            },
            balance,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AccountResponse {
    pub id: Uuid,
    pub phone: String,
    #[schema(value_type = String)]
    pub balance: Decimal,
    pub account_status: AccountStatus,
    pub status_message: String,
    pub credit_score: i32,
    pub otp_set: bool,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            otp_set: account.staff_otp().is_some(),
            id: account.id,
            phone: account.phone,
            balance: account.balance,
            account_status: account.account_status,
            status_message: account.status_message,
            credit_score: account.credit_score,
            is_active: account.is_active,
            updated_at: account.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn staff_edit_parses_everything() {
        let update = StaffAccountUpdate {
            account_status: Some("frozen".into()),
            withdraw_otp: Some(" 7788 ".into()),
            credit_score: Some(640),
            balance: Some("2500.50".into()),
            ..StaffAccountUpdate::default()
        };
        let edit = update.into_edit().unwrap();

        assert_eq!(edit.changes.account_status, Some(AccountStatus::Frozen));
        assert_eq!(edit.changes.withdraw_otp.as_deref(), Some("7788"));
        assert_eq!(edit.balance, Some(dec!(2500.50)));
        assert!(edit.changes.is_active.is_none());
    }

    #[test]
    fn any_bad_field_fails_the_whole_edit() {
        let bad_status = StaffAccountUpdate {
            account_status: Some("SLEEPING".into()),
            balance: Some("10".into()),
            ..StaffAccountUpdate::default()
        };
        assert!(bad_status.into_edit().is_err());

        let bad_balance = StaffAccountUpdate {
            balance: Some("ten".into()),
            ..StaffAccountUpdate::default()
        };
        assert!(bad_balance.into_edit().is_err());

        let sub_cent = StaffAccountUpdate {
            balance: Some("10.005".into()),
            ..StaffAccountUpdate::default()
        };
        assert!(sub_cent.into_edit().is_err());

        let bad_score = StaffAccountUpdate {
            credit_score: Some(5000),
            ..StaffAccountUpdate::default()
        };
        assert!(matches!(bad_score.into_edit(), Err(ApiError::Validation(_))));
    }
}
