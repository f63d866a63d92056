use crate::error::ApiError;
use crate::models::entities::account::Account;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = crate::schema::payment_methods)]
#[diesel(belongs_to(Account))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentMethod {
    pub id: Uuid,
    pub account_id: Uuid,
    pub wallet_name: String,
    pub wallet_phone: String,
    pub bank_name: String,
    pub bank_account: String,
    pub paypal_email: String,
    pub locked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PayoutChannel {
    Bank,
    Wallet,
    Paypal,
}

/// Trimmed payout fields as submitted. Empty strings mean "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq, AsChangeset)]
#[diesel(table_name = crate::schema::payment_methods)]
pub struct PayoutDetails {
    pub wallet_name: String,
    pub wallet_phone: String,
    pub bank_name: String,
    pub bank_account: String,
    pub paypal_email: String,
}

impl PayoutDetails {
    /// Exactly one channel group may be populated, and it must be complete.
    pub fn channel(&self) -> Result<PayoutChannel, ApiError> {
        let filled = |v: &str| !v.is_empty();

        let bank = filled(&self.bank_name) || filled(&self.bank_account);
        let wallet = filled(&self.wallet_name) || filled(&self.wallet_phone);
        let paypal = filled(&self.paypal_email);

        let chosen = [bank, wallet, paypal].iter().filter(|c| **c).count();
        if chosen != 1 {
            return Err(ApiError::Invalid(
                "Please choose exactly one payout method: bank, e-wallet or PayPal".into(),
            ));
        }

        if bank {
            if !filled(&self.bank_name) || !filled(&self.bank_account) {
                return Err(ApiError::Invalid(
                    "Bank name and account number are both required".into(),
                ));
            }
            return Ok(PayoutChannel::Bank);
        }
        if wallet {
            if !filled(&self.wallet_name) || !filled(&self.wallet_phone) {
                return Err(ApiError::Invalid(
                    "E-wallet name and phone are both required".into(),
                ));
            }
            return Ok(PayoutChannel::Wallet);
        }
        Ok(PayoutChannel::Paypal)
    }
}

impl PaymentMethod {
    pub fn details(&self) -> PayoutDetails {
        PayoutDetails {
            wallet_name: self.wallet_name.clone(),
            wallet_phone: self.wallet_phone.clone(),
            bank_name: self.bank_name.clone(),
            bank_account: self.bank_account.clone(),
            paypal_email: self.paypal_email.clone(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::payment_methods)]
pub struct NewPaymentMethod<'a> {
    pub account_id: Uuid,
    pub wallet_name: &'a str,
    pub wallet_phone: &'a str,
    pub bank_name: &'a str,
    pub bank_account: &'a str,
    pub paypal_email: &'a str,
    pub locked: bool,
}

impl<'a> NewPaymentMethod<'a> {
    pub fn from_details(account_id: Uuid, details: &'a PayoutDetails, locked: bool) -> Self {
        Self {
            account_id,
            wallet_name: &details.wallet_name,
            wallet_phone: &details.wallet_phone,
            bank_name: &details.bank_name,
            bank_account: &details.bank_account,
            paypal_email: &details.paypal_email,
            locked,
        }
    }
}
