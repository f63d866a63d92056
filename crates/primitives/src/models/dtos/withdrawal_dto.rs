use crate::error::{ApiError, WithdrawalRejection};
use crate::lending::MONEY_SCALE;
use crate::models::entities::enum_types::WithdrawalStatus;
use crate::models::entities::withdrawal::WithdrawalRequest;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateWithdrawalRequest {
    #[schema(example = "1000.00")]
    pub amount: Option<String>,
    #[schema(example = "482913")]
    pub otp: Option<String>,
}

impl CreateWithdrawalRequest {
    pub fn otp(&self) -> Option<&str> {
        self.otp.as_deref().map(str::trim).filter(|o| !o.is_empty())
    }

    /// Parses the requested amount; the balance checks come afterwards.
    /// Sub-cent amounts are refused, never rounded.
    pub fn parse_amount(&self) -> Result<Decimal, WithdrawalRejection> {
        let raw = self
            .amount
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or(WithdrawalRejection::AmountRequired)?;

        match Decimal::from_str(raw) {
            Ok(amount) if amount > Decimal::ZERO && amount.normalize().scale() <= MONEY_SCALE => {
                Ok(amount)
            }
            _ => Err(WithdrawalRejection::InvalidAmount),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct VerifyOtpRequest {
    pub otp: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OtpCheckResponse {
    pub ok: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WithdrawalResponse {
    pub id: Uuid,
    #[schema(value_type = String, example = "1000.00")]
    pub amount: Decimal,
    pub currency: String,
    pub status: WithdrawalStatus,
    pub status_label: String,
    pub otp_required: bool,
    pub refunded: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<WithdrawalRequest> for WithdrawalResponse {
    fn from(w: WithdrawalRequest) -> Self {
        Self {
            id: w.id,
            amount: w.amount,
            currency: w.currency,
            status: w.status,
            status_label: w.status.label().to_string(),
            otp_required: w.otp_required,
            refunded: w.refunded,
            created_at: w.created_at,
            updated_at: w.updated_at,
        }
    }
}

/// Result of a withdrawal attempt. `already` is set, and nothing is created,
/// when an open request exists for the account.
#[derive(Debug, Serialize, ToSchema)]
pub struct WithdrawalOutcome {
    pub ok: bool,
    pub already: bool,
    pub withdrawal: Option<WithdrawalResponse>,
    #[schema(value_type = String, example = "0.00")]
    pub balance: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WithdrawalStatusResponse {
    pub has: bool,
    pub id: Option<Uuid>,
    pub status: Option<WithdrawalStatus>,
    pub status_label: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Option<WithdrawalRequest>> for WithdrawalStatusResponse {
    fn from(latest: Option<WithdrawalRequest>) -> Self {
        match latest {
            Some(w) => Self {
                has: true,
                id: Some(w.id),
                status: Some(w.status),
                status_label: Some(w.status.label().to_string()),
                updated_at: Some(w.updated_at),
            },
            None => Self {
                has: false,
                id: None,
                status: None,
                status_label: None,
                updated_at: None,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WithdrawalHistoryResponse {
    pub items: Vec<WithdrawalResponse>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StaffWithdrawalUpdate {
    #[schema(example = "rejected")]
    pub status: Option<String>,
    #[serde(default)]
    pub otp_required: bool,
    pub staff_otp: Option<String>,
    #[serde(default)]
    pub refunded: bool,
}

/// Typed staff edit applied under the row lock.
#[derive(Debug, Clone, Default)]
pub struct WithdrawalEdit {
    pub status: Option<WithdrawalStatus>,
    pub otp_required: bool,
    pub staff_otp: String,
    pub refunded: bool,
}

impl StaffWithdrawalUpdate {
    pub fn validate(&self) -> Result<WithdrawalEdit, ApiError> {
        let status = self
            .status
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(WithdrawalStatus::parse)
            .transpose()?;

        Ok(WithdrawalEdit {
            status,
            otp_required: self.otp_required,
            staff_otp: self.staff_otp.as_deref().unwrap_or_default().trim().to_string(),
            refunded: self.refunded,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StaffWithdrawalRow {
    pub phone: String,
    #[serde(flatten)]
    pub withdrawal: WithdrawalResponse,
}
