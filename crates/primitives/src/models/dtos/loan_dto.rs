use crate::error::ApiError;
use crate::lending::{ensure_allowed_term, parse_int, parse_money, parse_rate};
use crate::models::dtos::upload_dto::Upload;
use crate::models::entities::enum_types::LoanStatus;
use crate::models::entities::loan::LoanApplication;
use crate::models::entities::loan_config::LoanTerms;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Prefix every signature payload must carry.
pub const SIGNATURE_PREFIX: &str = "data:image";

/// Raw loan application as collected from the multipart form.
#[derive(Debug, Clone, Default)]
pub struct LoanApplicationForm {
    pub full_name: String,
    pub age: String,
    pub current_living: String,
    pub hometown: String,
    pub income: String,
    pub monthly_expenses: String,
    pub guarantor_contact: String,
    pub guarantor_current_living: String,
    pub identity_name: String,
    pub identity_number: String,
    pub loan_purposes: Vec<String>,
    pub amount: String,
    pub term: String,
    pub signature_data: String,

    pub income_proof: Option<Upload>,
    pub id_front: Option<Upload>,
    pub id_back: Option<Upload>,
    pub selfie_with_id: Option<Upload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicantProfile {
    pub full_name: String,
    pub current_living: String,
    pub hometown: String,
    pub income: String,
    pub monthly_expenses: String,
    pub guarantor_contact: String,
    pub guarantor_current_living: String,
    pub identity_name: String,
    pub identity_number: String,
    pub loan_purposes: Vec<String>,
}

/// Application that passed every check and is ready to be priced and stored.
#[derive(Debug, Clone)]
pub struct ValidatedApplication {
    pub profile: ApplicantProfile,
    pub age: i32,
    pub amount: Decimal,
    pub term_months: i32,
}

impl LoanApplicationForm {
    /// Checks run in a fixed order: blank text, missing images, signature
    /// shape, numeric parsing, allowed terms, then configured amount bounds.
    pub fn validate(&self, terms: &LoanTerms) -> Result<ValidatedApplication, ApiError> {
        let required = [
            ("full name", &self.full_name),
            ("age", &self.age),
            ("current living", &self.current_living),
            ("hometown", &self.hometown),
            ("monthly expenses", &self.monthly_expenses),
            ("guarantor contact", &self.guarantor_contact),
            ("guarantor current living", &self.guarantor_current_living),
            ("identity name", &self.identity_name),
            ("identity number", &self.identity_number),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ApiError::Invalid(format!("Please fill in {}", field)));
        }

        let images = [
            ("ID front", &self.id_front),
            ("ID back", &self.id_back),
            ("selfie with ID", &self.selfie_with_id),
        ];
        if let Some((field, _)) = images.iter().find(|(_, upload)| missing(upload)) {
            return Err(ApiError::Invalid(format!("Please upload {}", field)));
        }

        if !self.signature_data.trim().starts_with(SIGNATURE_PREFIX) {
            return Err(ApiError::Invalid("Please sign before submitting".into()));
        }

        let age = parse_int(&self.age, "age")?;
        let amount = parse_money(&self.amount, "amount")?;
        let term_months = parse_int(&self.term, "term")?;

        ensure_allowed_term(term_months)?;
        terms.check_amount(amount)?;

        Ok(ValidatedApplication {
            profile: ApplicantProfile {
                full_name: self.full_name.trim().to_string(),
                current_living: self.current_living.trim().to_string(),
                hometown: self.hometown.trim().to_string(),
                income: self.income.trim().to_string(),
                monthly_expenses: self.monthly_expenses.trim().to_string(),
                guarantor_contact: self.guarantor_contact.trim().to_string(),
                guarantor_current_living: self.guarantor_current_living.trim().to_string(),
                identity_name: self.identity_name.trim().to_string(),
                identity_number: self.identity_number.trim().to_string(),
                loan_purposes: self
                    .loan_purposes
                    .iter()
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect(),
            },
            age,
            amount,
            term_months,
        })
    }
}

/// Raw staff edit from the loan detail form. Blank fields mean "unchanged".
#[derive(Debug, Clone, Default)]
pub struct StaffLoanUpdate {
    pub full_name: Option<String>,
    pub current_living: Option<String>,
    pub hometown: Option<String>,
    pub income: Option<String>,
    pub monthly_expenses: Option<String>,
    pub guarantor_contact: Option<String>,
    pub guarantor_current_living: Option<String>,
    pub identity_name: Option<String>,
    pub identity_number: Option<String>,
    pub phone: Option<String>,
    pub age: Option<String>,
    pub amount: Option<String>,
    pub term: Option<String>,
    pub interest_rate_monthly: Option<String>,
    pub status: Option<String>,
    pub signature_data: Option<String>,

    pub income_proof: Option<Upload>,
    pub id_front: Option<Upload>,
    pub id_back: Option<Upload>,
    pub selfie_with_id: Option<Upload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEdit {
    pub full_name: Option<String>,
    pub current_living: Option<String>,
    pub hometown: Option<String>,
    pub income: Option<String>,
    pub monthly_expenses: Option<String>,
    pub guarantor_contact: Option<String>,
    pub guarantor_current_living: Option<String>,
    pub identity_name: Option<String>,
    pub identity_number: Option<String>,
}

/// Typed staff edit; every field was parsed before anything is applied.
#[derive(Debug, Clone, Default)]
pub struct LoanEdit {
    pub profile: ProfileEdit,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub amount: Option<Decimal>,
    pub term_months: Option<i32>,
    pub interest_rate_monthly: Option<Decimal>,
    pub status: Option<LoanStatus>,
}

fn missing(upload: &Option<Upload>) -> bool {
    match upload {
        Some(file) => file.is_empty(),
        None => true,
    }
}

fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn given_owned(value: &Option<String>) -> Option<String> {
    given(value).map(str::to_string)
}

impl StaffLoanUpdate {
    pub fn validate(&self) -> Result<LoanEdit, ApiError> {
        let age = given(&self.age).map(|v| parse_int(v, "age")).transpose()?;
        let amount = given(&self.amount)
            .map(|v| parse_money(v, "amount"))
            .transpose()?;
        let term_months = given(&self.term)
            .map(|v| parse_int(v, "term"))
            .transpose()?;
        let interest_rate_monthly = given(&self.interest_rate_monthly)
            .map(parse_rate)
            .transpose()?;

        if let Some(term) = term_months {
            ensure_allowed_term(term)?;
        }
        if amount.is_some_and(|a| a <= Decimal::ZERO) {
            return Err(ApiError::Invalid("Loan amount must be positive".into()));
        }

        let status = given(&self.status).map(LoanStatus::parse).transpose()?;

        if let Some(sig) = given(&self.signature_data) {
            if !sig.starts_with(SIGNATURE_PREFIX) {
                return Err(ApiError::Invalid("Invalid signature data".into()));
            }
        }

        Ok(LoanEdit {
            profile: ProfileEdit {
                full_name: given_owned(&self.full_name),
                current_living: given_owned(&self.current_living),
                hometown: given_owned(&self.hometown),
                income: given_owned(&self.income),
                monthly_expenses: given_owned(&self.monthly_expenses),
                guarantor_contact: given_owned(&self.guarantor_contact),
                guarantor_current_living: given_owned(&self.guarantor_current_living),
                identity_name: given_owned(&self.identity_name),
                identity_number: given_owned(&self.identity_number),
            },
            phone: given_owned(&self.phone),
            age,
            amount,
            term_months,
            interest_rate_monthly,
            status,
        })
    }

    pub fn has_uploads(&self) -> bool {
        self.income_proof.is_some()
            || self.id_front.is_some()
            || self.id_back.is_some()
            || self.selfie_with_id.is_some()
            || given(&self.signature_data).is_some()
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StaffLoanStatusRequest {
    #[schema(example = "APPROVED")]
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoanResponse {
    pub id: Uuid,
    pub account_id: Uuid,
    pub full_name: String,
    pub age: i32,
    pub current_living: String,
    pub hometown: String,
    pub identity_name: String,
    pub identity_number: String,
    pub loan_purposes: Vec<String>,
    #[schema(value_type = String, example = "1000000.00")]
    pub amount: Decimal,
    pub term_months: i32,
    #[schema(value_type = String, example = "0.0003")]
    pub interest_rate_monthly: Decimal,
    #[schema(value_type = String, example = "83633.33")]
    pub monthly_repayment: Decimal,
    pub status: LoanStatus,
    pub status_label: String,
    pub signature_image: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<LoanApplication> for LoanResponse {
    fn from(loan: LoanApplication) -> Self {
        let loan_purposes = serde_json::from_value(loan.loan_purposes).unwrap_or_default();
        Self {
            id: loan.id,
            account_id: loan.account_id,
            full_name: loan.full_name,
            age: loan.age,
            current_living: loan.current_living,
            hometown: loan.hometown,
            identity_name: loan.identity_name,
            identity_number: loan.identity_number,
            loan_purposes,
            amount: loan.amount,
            term_months: loan.term_months,
            interest_rate_monthly: loan.interest_rate_monthly,
            monthly_repayment: loan.monthly_repayment,
            status: loan.status,
            status_label: loan.status.label().to_string(),
            signature_image: loan.signature_image,
            approved_at: loan.approved_at,
            created_at: loan.created_at,
        }
    }
}

/// Customer-facing status card. `visible` is false until the customer has
/// a loan and a locked payment method.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoanStatusView {
    pub visible: bool,
    pub loan_id: Option<Uuid>,
    pub status: Option<LoanStatus>,
    pub status_label: Option<String>,
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
    pub term_months: Option<i32>,
}

impl LoanStatusView {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            loan_id: None,
            status: None,
            status_label: None,
            amount: None,
            term_months: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScheduleEntry {
    pub installment: u32,
    pub due_date: NaiveDate,
    #[schema(value_type = String, example = "83633.33")]
    pub amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RepaymentScheduleResponse {
    pub loan_id: Uuid,
    pub starts_from: DateTime<Utc>,
    pub term_months: i32,
    #[schema(value_type = String)]
    pub monthly_repayment: Decimal,
    pub entries: Vec<ScheduleEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StaffLoanRow {
    pub phone: String,
    #[serde(flatten)]
    pub loan: LoanResponse,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn image(name: &str) -> Option<Upload> {
        Some(Upload {
            file_name: name.into(),
            content_type: Some("image/jpeg".into()),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
        })
    }

    fn form() -> LoanApplicationForm {
        LoanApplicationForm {
            full_name: "Maria Santos".into(),
            age: "29".into(),
            current_living: "Quezon City".into(),
            hometown: "Cebu".into(),
            income: "35000".into(),
            monthly_expenses: "12000".into(),
            guarantor_contact: "09170000000".into(),
            guarantor_current_living: "Manila".into(),
            identity_name: "UMID".into(),
            identity_number: "0111-2222333-4".into(),
            loan_purposes: vec!["business".into(), " ".into()],
            amount: "1000000".into(),
            term: "12".into(),
            signature_data: "data:image/png;base64,iVBORw0KGgo=".into(),
            income_proof: None,
            id_front: image("front.jpg"),
            id_back: image("back.jpg"),
            selfie_with_id: image("selfie.jpg"),
        }
    }

    #[test]
    fn valid_form_passes() {
        let app = form().validate(&LoanTerms::default()).unwrap();
        assert_eq!(app.amount, dec!(1000000));
        assert_eq!(app.term_months, 12);
        assert_eq!(app.age, 29);
        assert_eq!(app.profile.loan_purposes, vec!["business".to_string()]);
    }

    #[test]
    fn amount_below_minimum_is_rejected() {
        let mut f = form();
        f.amount = "150000".into();
        let err = f.validate(&LoanTerms::default()).unwrap_err();
        assert!(err.to_string().contains("at least"));
    }

    #[test]
    fn blank_text_is_reported_before_anything_else() {
        let mut f = form();
        f.hometown = "  ".into();
        f.term = "7".into();
        let err = f.validate(&LoanTerms::default()).unwrap_err();
        assert!(err.to_string().contains("hometown"));
    }

    #[test]
    fn missing_image_is_rejected() {
        let mut f = form();
        f.id_back = None;
        let err = f.validate(&LoanTerms::default()).unwrap_err();
        assert!(err.to_string().contains("ID back"));
    }

    #[test]
    fn signature_must_be_embedded_image() {
        let mut f = form();
        f.signature_data = "hello".into();
        assert!(matches!(
            f.validate(&LoanTerms::default()),
            Err(ApiError::Invalid(_))
        ));
    }

    #[test]
    fn unparseable_numbers_and_terms_are_rejected() {
        let mut f = form();
        f.age = "twenty".into();
        assert!(f.validate(&LoanTerms::default()).is_err());

        let mut f = form();
        f.term = "18".into();
        let err = f.validate(&LoanTerms::default()).unwrap_err();
        assert!(err.to_string().contains("Invalid loan term"));
    }

    #[test]
    fn staff_update_parses_all_fields_up_front() {
        let update = StaffLoanUpdate {
            amount: Some("500000".into()),
            term: Some("24".into()),
            status: Some("approved".into()),
            hometown: Some("".into()),
            ..StaffLoanUpdate::default()
        };
        let edit = update.validate().unwrap();

        assert_eq!(edit.amount, Some(dec!(500000)));
        assert_eq!(edit.term_months, Some(24));
        assert_eq!(edit.status, Some(LoanStatus::Approved));
        assert_eq!(edit.profile.hometown, None);
    }

    #[test]
    fn staff_update_rejects_bad_status_and_term() {
        let bad_status = StaffLoanUpdate {
            status: Some("DONE".into()),
            ..StaffLoanUpdate::default()
        };
        assert!(bad_status.validate().is_err());

        let bad_term = StaffLoanUpdate {
            term: Some("5".into()),
            ..StaffLoanUpdate::default()
        };
        assert!(bad_term.validate().is_err());

        let bad_age = StaffLoanUpdate {
            age: Some("3x".into()),
            ..StaffLoanUpdate::default()
        };
        assert!(bad_age.validate().is_err());
    }

    #[test]
    fn staff_update_keeps_money_and_rate_in_column_range() {
        let sub_cent = StaffLoanUpdate {
            amount: Some("500000.005".into()),
            ..StaffLoanUpdate::default()
        };
        assert!(matches!(sub_cent.validate(), Err(ApiError::Invalid(_))));

        let huge_rate = StaffLoanUpdate {
            interest_rate_monthly: Some("100000000000000000000000".into()),
            ..StaffLoanUpdate::default()
        };
        assert!(matches!(huge_rate.validate(), Err(ApiError::Invalid(_))));

        let fine_rate = StaffLoanUpdate {
            interest_rate_monthly: Some("0.0000005".into()),
            ..StaffLoanUpdate::default()
        };
        assert!(fine_rate.validate().is_err());
    }

    #[test]
    fn application_amount_must_be_whole_cents() {
        let mut sub_cent = form();
        sub_cent.amount = "250000.125".into();
        assert!(matches!(
            sub_cent.validate(&LoanTerms::default()),
            Err(ApiError::Invalid(_))
        ));
    }
}
