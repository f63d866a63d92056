use crate::error::ApiError;
use crate::lending::{parse_money, parse_rate};
use crate::models::entities::loan_config::LoanTerms;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct LoanConfigResponse {
    #[serde(flatten)]
    pub terms: LoanTerms,
    /// `None` while the defaults are in force.
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateLoanConfigRequest {
    #[schema(example = "0.0003")]
    pub interest_rate_monthly: String,
    #[schema(example = "200000")]
    pub min_amount: String,
    #[schema(example = "60000000")]
    pub max_amount: String,
}

impl UpdateLoanConfigRequest {
    pub fn terms(&self) -> Result<LoanTerms, ApiError> {
        let terms = LoanTerms {
            interest_rate_monthly: parse_rate(&self.interest_rate_monthly)?,
            min_amount: parse_money(&self.min_amount, "minimum amount")?,
            max_amount: parse_money(&self.max_amount, "maximum amount")?,
        };
        terms.validate()?;
        Ok(terms)
    }
}
