use crate::error::ApiError;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, DbEnum, Display, EnumString, ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::AccountStatus"]
#[DbValueStyle = "SCREAMING_SNAKE_CASE"]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum AccountStatus {
    Active,
    Frozen,
    Rejected,
    NewOtpCode,
    InvalidBankAccount,
    LowCreditScore,
    NewDocumentsRequired,
    TaxVerification,
    VipChannel,
    Overdue,
}

impl AccountStatus {
    pub fn parse(input: &str) -> Result<Self, ApiError> {
        AccountStatus::from_str(input.trim())
            .map_err(|_| ApiError::Invalid(format!("Invalid account status: {}", input)))
    }

    /// Title-cased label, e.g. `NEW_OTP_CODE` -> `New Otp Code`.
    pub fn label(&self) -> String {
        self.to_string()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_string() + &chars.as_str().to_lowercase(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Canned customer-facing notice shown when staff left no status message.
    pub fn default_notice(&self) -> &'static str {
        match self {
            AccountStatus::Active => "",
            AccountStatus::Frozen => {
                "Your account has been FROZEN. Please contact company department!"
            }
            AccountStatus::Rejected => {
                "Your account has been REJECTED. Please contact company department!"
            }
            _ => "Please contact company department!",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, DbEnum, Display, EnumString, ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::LoanStatus"]
#[DbValueStyle = "SCREAMING_SNAKE_CASE"]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum LoanStatus {
    Pending,
    Review,
    Approved,
    Rejected,
    Paid,
}

impl LoanStatus {
    pub fn parse(input: &str) -> Result<Self, ApiError> {
        LoanStatus::from_str(input.trim())
            .map_err(|_| ApiError::Invalid(format!("Invalid loan status: {}", input.trim())))
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "Pending",
            LoanStatus::Review => "In Review",
            LoanStatus::Approved => "Approved",
            LoanStatus::Rejected => "Rejected",
            LoanStatus::Paid => "Paid",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, DbEnum, Display, EnumString, ToSchema,
)]
#[ExistingTypePath = "crate::schema::sql_types::WithdrawalStatus"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum WithdrawalStatus {
    Processing,
    Waiting,
    Reviewed,
    Paid,
    Rejected,
}

impl WithdrawalStatus {
    pub const OPEN: [WithdrawalStatus; 3] = [
        WithdrawalStatus::Processing,
        WithdrawalStatus::Waiting,
        WithdrawalStatus::Reviewed,
    ];

    pub fn parse(input: &str) -> Result<Self, ApiError> {
        WithdrawalStatus::from_str(input.trim())
            .map_err(|_| ApiError::Invalid(format!("Invalid withdrawal status: {}", input.trim())))
    }

    pub fn is_open(&self) -> bool {
        Self::OPEN.contains(self)
    }

    pub fn label(&self) -> &'static str {
        match self {
            WithdrawalStatus::Processing => "Processing",
            WithdrawalStatus::Waiting => "Waiting for approval",
            WithdrawalStatus::Reviewed => "Reviewed",
            WithdrawalStatus::Paid => "Payment sent",
            WithdrawalStatus::Rejected => "Rejected",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, DbEnum, Display, ToSchema)]
#[ExistingTypePath = "crate::schema::sql_types::LedgerReason"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LedgerReason {
    LoanApproval,
    LoanApprovalReversal,
    WithdrawalDebit,
    WithdrawalRefund,
    StaffAdjustment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_parse_case_insensitively() {
        assert_eq!(LoanStatus::parse(" approved ").unwrap(), LoanStatus::Approved);
        assert_eq!(
            WithdrawalStatus::parse("REJECTED").unwrap(),
            WithdrawalStatus::Rejected
        );
        assert_eq!(
            AccountStatus::parse("new_otp_code").unwrap(),
            AccountStatus::NewOtpCode
        );
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        assert!(matches!(LoanStatus::parse("DONE"), Err(ApiError::Invalid(_))));
        assert!(matches!(WithdrawalStatus::parse(""), Err(ApiError::Invalid(_))));
    }

    #[test]
    fn open_withdrawal_states() {
        assert!(WithdrawalStatus::Processing.is_open());
        assert!(WithdrawalStatus::Reviewed.is_open());
        assert!(!WithdrawalStatus::Paid.is_open());
        assert!(!WithdrawalStatus::Rejected.is_open());
    }

    #[test]
    fn display_matches_stored_labels() {
        assert_eq!(LoanStatus::Review.to_string(), "REVIEW");
        assert_eq!(AccountStatus::VipChannel.to_string(), "VIP_CHANNEL");
        assert_eq!(WithdrawalStatus::Waiting.to_string(), "waiting");
    }

    #[test]
    fn account_status_labels() {
        assert_eq!(AccountStatus::NewOtpCode.label(), "New Otp Code");
        assert_eq!(AccountStatus::Active.label(), "Active");
    }
}
