use crate::error::ApiError;
use crate::models::entities::payment_method::{PaymentMethod, PayoutChannel, PayoutDetails};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::ValidateEmail;

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().trim().to_string()
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SavePaymentMethodRequest {
    #[schema(example = "GCash")]
    pub wallet_name: Option<String>,
    pub wallet_phone: Option<String>,
    #[schema(example = "BDO")]
    pub bank_name: Option<String>,
    pub bank_account: Option<String>,
    pub paypal_email: Option<String>,
}

impl SavePaymentMethodRequest {
    pub fn details(&self) -> PayoutDetails {
        PayoutDetails {
            wallet_name: trimmed(&self.wallet_name),
            wallet_phone: trimmed(&self.wallet_phone),
            bank_name: trimmed(&self.bank_name),
            bank_account: trimmed(&self.bank_account),
            paypal_email: trimmed(&self.paypal_email),
        }
    }
}

/// Staff override. Omitted fields keep their value; only the e-mail is checked.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StaffPaymentMethodUpdate {
    pub wallet_name: Option<String>,
    pub wallet_phone: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account: Option<String>,
    pub paypal_email: Option<String>,
    pub locked: Option<bool>,
}

impl StaffPaymentMethodUpdate {
    pub fn merged_onto(&self, current: PayoutDetails) -> Result<PayoutDetails, ApiError> {
        let pick = |given: &Option<String>, existing: String| match given {
            Some(v) => v.trim().to_string(),
            None => existing,
        };

        let paypal_email = match &self.paypal_email {
            Some(email) => {
                let email = email.trim().to_lowercase();
                if !email.is_empty() && !email.validate_email() {
                    return Err(ApiError::Invalid("Invalid PayPal e-mail".into()));
                }
                email
            }
            None => current.paypal_email,
        };

        Ok(PayoutDetails {
            wallet_name: pick(&self.wallet_name, current.wallet_name),
            wallet_phone: pick(&self.wallet_phone, current.wallet_phone),
            bank_name: pick(&self.bank_name, current.bank_name),
            bank_account: pick(&self.bank_account, current.bank_account),
            paypal_email,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentMethodResponse {
    pub id: Uuid,
    pub account_id: Uuid,
    pub channel: Option<PayoutChannel>,
    pub wallet_name: String,
    pub wallet_phone: String,
    pub bank_name: String,
    pub bank_account: String,
    pub paypal_email: String,
    pub locked: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<PaymentMethod> for PaymentMethodResponse {
    fn from(pm: PaymentMethod) -> Self {
        Self {
            channel: pm.details().channel().ok(),
            id: pm.id,
            account_id: pm.account_id,
            wallet_name: pm.wallet_name,
            wallet_phone: pm.wallet_phone,
            bank_name: pm.bank_name,
            bank_account: pm.bank_account,
            paypal_email: pm.paypal_email,
            locked: pm.locked,
            updated_at: pm.updated_at,
        }
    }
}
