use crate::lending::ApprovalReversal;
use eyre::{eyre, Report};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct LendingPolicy {
    pub withdrawal_currency: String,
    pub approval_reversal: ApprovalReversal,
    /// A PENDING loan older than this is shown to the customer as REVIEW.
    pub review_display_after_hours: i64,
}

impl Default for LendingPolicy {
    fn default() -> Self {
        Self {
            withdrawal_currency: "PHP".into(),
            approval_reversal: ApprovalReversal::Keep,
            review_display_after_hours: 3,
        }
    }
}

impl LendingPolicy {
    pub fn new() -> Result<Self, Report> {
        let defaults = Self::default();

        Ok(Self {
            withdrawal_currency: env::var("WITHDRAWAL_CURRENCY")
                .map(|c| c.trim().to_uppercase())
                .unwrap_or(defaults.withdrawal_currency),

            approval_reversal: match env::var("APPROVAL_REVERSAL") {
                Ok(raw) => ApprovalReversal::from_str(raw.trim())
                    .map_err(|_| eyre!("APPROVAL_REVERSAL must be `keep` or `debit`, got {}", raw))?,
                Err(_) => defaults.approval_reversal,
            },

            review_display_after_hours: match env::var("REVIEW_DISPLAY_AFTER_HOURS") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|e| eyre!("Invalid REVIEW_DISPLAY_AFTER_HOURS: {}", e))?,
                Err(_) => defaults.review_display_after_hours,
            },
        })
    }
}
