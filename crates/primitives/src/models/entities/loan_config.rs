use crate::error::ApiError;
use crate::lending::{check_rate, is_money};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Primary key of the single configuration row.
pub const LOAN_CONFIG_ID: i32 = 1;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = crate::schema::loan_configs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LoanConfig {
    pub id: i32,
    pub interest_rate_monthly: Decimal,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// Rate and bounds in force for new applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LoanTerms {
    #[schema(value_type = String, example = "0.0003")]
    pub interest_rate_monthly: Decimal,
    #[schema(value_type = String, example = "200000")]
    pub min_amount: Decimal,
    #[schema(value_type = String, example = "60000000")]
    pub max_amount: Decimal,
}

impl Default for LoanTerms {
    fn default() -> Self {
        Self {
            interest_rate_monthly: Decimal::new(3, 4),
            min_amount: Decimal::from(200_000),
            max_amount: Decimal::from(60_000_000),
        }
    }
}

impl From<LoanConfig> for LoanTerms {
    fn from(cfg: LoanConfig) -> Self {
        Self {
            interest_rate_monthly: cfg.interest_rate_monthly,
            min_amount: cfg.min_amount,
            max_amount: cfg.max_amount,
        }
    }
}

impl LoanTerms {
    pub fn check_amount(&self, amount: Decimal) -> Result<(), ApiError> {
        if amount < self.min_amount {
            return Err(ApiError::Invalid(format!(
                "Loan amount must be at least {}",
                self.min_amount
            )));
        }
        if amount > self.max_amount {
            return Err(ApiError::Invalid(format!(
                "Loan amount must not exceed {}",
                self.max_amount
            )));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        check_rate(self.interest_rate_monthly)?;
        if !is_money(self.min_amount) || !is_money(self.max_amount) {
            return Err(ApiError::Invalid(
                "Loan amount bounds must be whole cents within range".into(),
            ));
        }
        if self.min_amount <= Decimal::ZERO {
            return Err(ApiError::Invalid("Minimum amount must be positive".into()));
        }
        if self.min_amount > self.max_amount {
            return Err(ApiError::Invalid(
                "Minimum amount must not exceed maximum amount".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::loan_configs)]
pub struct LoanConfigRow {
    pub id: i32,
    pub interest_rate_monthly: Decimal,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl LoanConfigRow {
    pub fn new(terms: LoanTerms, now: DateTime<Utc>) -> Self {
        Self {
            id: LOAN_CONFIG_ID,
            interest_rate_monthly: terms.interest_rate_monthly,
            min_amount: terms.min_amount,
            max_amount: terms.max_amount,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults_match_house_terms() {
        let terms = LoanTerms::default();
        assert_eq!(terms.interest_rate_monthly, dec!(0.0003));
        assert_eq!(terms.min_amount, dec!(200000));
        assert_eq!(terms.max_amount, dec!(60000000));
    }

    #[test]
    fn amount_bounds_are_inclusive() {
        let terms = LoanTerms::default();
        assert!(terms.check_amount(dec!(200000)).is_ok());
        assert!(terms.check_amount(dec!(60000000)).is_ok());
        assert!(matches!(terms.check_amount(dec!(150000)), Err(ApiError::Invalid(_))));
        assert!(matches!(terms.check_amount(dec!(60000000.01)), Err(ApiError::Invalid(_))));
    }

    #[test]
    fn config_update_rules() {
        let mut terms = LoanTerms::default();
        assert!(terms.validate().is_ok());

        terms.interest_rate_monthly = dec!(-0.1);
        assert!(terms.validate().is_err());

        terms = LoanTerms {
            min_amount: dec!(500),
            max_amount: dec!(100),
            ..LoanTerms::default()
        };
        assert!(terms.validate().is_err());

        terms = LoanTerms {
            min_amount: Decimal::ZERO,
            ..LoanTerms::default()
        };
        assert!(terms.validate().is_err());

        terms = LoanTerms {
            interest_rate_monthly: dec!(10000),
            ..LoanTerms::default()
        };
        assert!(terms.validate().is_err());

        terms = LoanTerms {
            interest_rate_monthly: dec!(0.0003125),
            ..LoanTerms::default()
        };
        assert!(terms.validate().is_err());

        terms = LoanTerms {
            min_amount: dec!(200000.001),
            ..LoanTerms::default()
        };
        assert!(terms.validate().is_err());
    }
}
