use crate::error::ApiError;
use crate::lending::monthly_repayment;
use crate::models::dtos::loan_dto::LoanEdit;
use crate::models::entities::account::Account;
use crate::models::entities::enum_types::LoanStatus;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = crate::schema::loan_applications)]
#[diesel(belongs_to(Account))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LoanApplication {
    pub id: Uuid,
    pub account_id: Uuid,

    pub full_name: String,
    pub age: i32,
    pub current_living: String,
    pub hometown: String,
    pub income: String,
    pub monthly_expenses: String,
    pub guarantor_contact: String,
    pub guarantor_current_living: String,
    pub identity_name: String,
    pub identity_number: String,
    pub loan_purposes: Value,

    pub income_proof: Option<String>,
    pub id_front: Option<String>,
    pub id_back: Option<String>,
    pub selfie_with_id: Option<String>,
    pub signature_image: Option<String>,

    pub amount: Decimal,
    pub term_months: i32,
    pub interest_rate_monthly: Decimal,
    pub monthly_repayment: Decimal,

    pub status: LoanStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Replacement file paths for a staff edit, already normalized and stored.
#[derive(Debug, Default, Clone)]
pub struct LoanDocuments {
    pub income_proof: Option<String>,
    pub id_front: Option<String>,
    pub id_back: Option<String>,
    pub selfie_with_id: Option<String>,
    pub signature_image: Option<String>,
}

impl LoanApplication {
    /// Moves the loan to `next`, stamping or clearing the approval time.
    /// Returns the previous status.
    pub fn apply_status(&mut self, next: LoanStatus, now: DateTime<Utc>) -> LoanStatus {
        let previous = self.status;
        self.status = next;

        if next == LoanStatus::Approved && previous != LoanStatus::Approved {
            self.approved_at = Some(now);
        }
        if next != LoanStatus::Approved {
            self.approved_at = None;
        }

        previous
    }

    pub fn recompute_repayment(&mut self) -> Result<(), ApiError> {
        self.monthly_repayment =
            monthly_repayment(self.amount, self.interest_rate_monthly, self.term_months)?;
        Ok(())
    }

    /// Applies a validated staff edit in memory. Repayment is always
    /// recomputed; the status transition (if any) is applied last.
    pub fn apply_edit(
        &mut self,
        edit: &LoanEdit,
        now: DateTime<Utc>,
    ) -> Result<LoanStatus, ApiError> {
        let profile = &edit.profile;
        let assign = |target: &mut String, value: &Option<String>| {
            if let Some(v) = value {
                *target = v.clone();
            }
        };
        assign(&mut self.full_name, &profile.full_name);
        assign(&mut self.current_living, &profile.current_living);
        assign(&mut self.hometown, &profile.hometown);
        assign(&mut self.income, &profile.income);
        assign(&mut self.monthly_expenses, &profile.monthly_expenses);
        assign(&mut self.guarantor_contact, &profile.guarantor_contact);
        assign(
            &mut self.guarantor_current_living,
            &profile.guarantor_current_living,
        );
        assign(&mut self.identity_name, &profile.identity_name);
        assign(&mut self.identity_number, &profile.identity_number);

        if let Some(age) = edit.age {
            self.age = age;
        }
        if let Some(amount) = edit.amount {
            self.amount = amount;
        }
        if let Some(term) = edit.term_months {
            self.term_months = term;
        }
        if let Some(rate) = edit.interest_rate_monthly {
            self.interest_rate_monthly = rate;
        }
        self.recompute_repayment()?;

        let previous = match edit.status {
            Some(next) => self.apply_status(next, now),
            None => self.status,
        };
        self.updated_at = now;

        Ok(previous)
    }

    pub fn replace_documents(&mut self, docs: LoanDocuments) {
        let replace = |target: &mut Option<String>, value: Option<String>| {
            if value.is_some() {
                *target = value;
            }
        };
        replace(&mut self.income_proof, docs.income_proof);
        replace(&mut self.id_front, docs.id_front);
        replace(&mut self.id_back, docs.id_back);
        replace(&mut self.selfie_with_id, docs.selfie_with_id);
        replace(&mut self.signature_image, docs.signature_image);
    }

    pub fn changeset(&self) -> LoanChangeset<'_> {
        LoanChangeset {
            full_name: &self.full_name,
            age: self.age,
            current_living: &self.current_living,
            hometown: &self.hometown,
            income: &self.income,
            monthly_expenses: &self.monthly_expenses,
            guarantor_contact: &self.guarantor_contact,
            guarantor_current_living: &self.guarantor_current_living,
            identity_name: &self.identity_name,
            identity_number: &self.identity_number,
            income_proof: self.income_proof.as_deref(),
            id_front: self.id_front.as_deref(),
            id_back: self.id_back.as_deref(),
            selfie_with_id: self.selfie_with_id.as_deref(),
            signature_image: self.signature_image.as_deref(),
            amount: self.amount,
            term_months: self.term_months,
            interest_rate_monthly: self.interest_rate_monthly,
            monthly_repayment: self.monthly_repayment,
            status: self.status,
            approved_at: self.approved_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::loan_applications)]
pub struct NewLoanApplication {
    pub account_id: Uuid,
    pub full_name: String,
    pub age: i32,
    pub current_living: String,
    pub hometown: String,
    pub income: String,
    pub monthly_expenses: String,
    pub guarantor_contact: String,
    pub guarantor_current_living: String,
    pub identity_name: String,
    pub identity_number: String,
    pub loan_purposes: Value,
    pub income_proof: Option<String>,
    pub id_front: Option<String>,
    pub id_back: Option<String>,
    pub selfie_with_id: Option<String>,
    pub signature_image: Option<String>,
    pub amount: Decimal,
    pub term_months: i32,
    pub interest_rate_monthly: Decimal,
    pub monthly_repayment: Decimal,
    pub status: LoanStatus,
}

/// Full snapshot of the staff-editable columns.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::loan_applications)]
#[diesel(treat_none_as_null = true)]
pub struct LoanChangeset<'a> {
    pub full_name: &'a str,
    pub age: i32,
    pub current_living: &'a str,
    pub hometown: &'a str,
    pub income: &'a str,
    pub monthly_expenses: &'a str,
    pub guarantor_contact: &'a str,
    pub guarantor_current_living: &'a str,
    pub identity_name: &'a str,
    pub identity_number: &'a str,
    pub income_proof: Option<&'a str>,
    pub id_front: Option<&'a str>,
    pub id_back: Option<&'a str>,
    pub selfie_with_id: Option<&'a str>,
    pub signature_image: Option<&'a str>,
    pub amount: Decimal,
    pub term_months: i32,
    pub interest_rate_monthly: Decimal,
    pub monthly_repayment: Decimal,
    pub status: LoanStatus,
    pub approved_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::dtos::loan_dto::ProfileEdit;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn sample_loan() -> LoanApplication {
        let created = Utc::now() - Duration::days(2);
        LoanApplication {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            full_name: "Dara Sok".into(),
            age: 31,
            current_living: "Phnom Penh".into(),
            hometown: "Kampot".into(),
            income: "900".into(),
            monthly_expenses: "300".into(),
            guarantor_contact: "012345678".into(),
            guarantor_current_living: "Phnom Penh".into(),
            identity_name: "National ID".into(),
            identity_number: "N0012345".into(),
            loan_purposes: serde_json::json!(["business"]),
            income_proof: None,
            id_front: Some("id_cards/front.webp".into()),
            id_back: Some("id_cards/back.webp".into()),
            selfie_with_id: Some("id_cards/selfie.webp".into()),
            signature_image: Some("signatures/sig.png".into()),
            amount: dec!(1000000),
            term_months: 12,
            interest_rate_monthly: dec!(0.0003),
            monthly_repayment: dec!(83633.33),
            status: LoanStatus::Pending,
            approved_at: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn first_approval_stamps_time() {
        let mut loan = sample_loan();
        let now = Utc::now();
        let previous = loan.apply_status(LoanStatus::Approved, now);

        assert_eq!(previous, LoanStatus::Pending);
        assert_eq!(loan.approved_at, Some(now));
    }

    #[test]
    fn repeated_approval_keeps_original_time() {
        let mut loan = sample_loan();
        let first = Utc::now() - Duration::hours(5);
        loan.apply_status(LoanStatus::Approved, first);
        let previous = loan.apply_status(LoanStatus::Approved, Utc::now());

        assert_eq!(previous, LoanStatus::Approved);
        assert_eq!(loan.approved_at, Some(first));
    }

    #[test]
    fn leaving_approved_clears_time() {
        let mut loan = sample_loan();
        loan.apply_status(LoanStatus::Approved, Utc::now());
        loan.apply_status(LoanStatus::Paid, Utc::now());

        assert_eq!(loan.status, LoanStatus::Paid);
        assert!(loan.approved_at.is_none());
    }

    #[test]
    fn edit_recomputes_repayment_from_new_terms() {
        let mut loan = sample_loan();
        let edit = LoanEdit {
            amount: Some(dec!(2400000)),
            term_months: Some(24),
            ..LoanEdit::default()
        };
        loan.apply_edit(&edit, Utc::now()).unwrap();

        // (2_400_000 + 2_400_000 * 0.0003 * 24) / 24
        assert_eq!(loan.monthly_repayment, dec!(100720.00));
    }

    #[test]
    fn edit_with_new_rate_recomputes() {
        let mut loan = sample_loan();
        let edit = LoanEdit {
            interest_rate_monthly: Some(dec!(0.01)),
            ..LoanEdit::default()
        };
        loan.apply_edit(&edit, Utc::now()).unwrap();
        // (1_000_000 + 120_000) / 12
        assert_eq!(loan.monthly_repayment, dec!(93333.33));
    }

    #[test]
    fn oversized_rate_fails_instead_of_overflowing() {
        let mut loan = sample_loan();
        let edit = LoanEdit {
            interest_rate_monthly: Some(Decimal::from_i128_with_scale(10i128.pow(23), 0)),
            ..LoanEdit::default()
        };
        assert!(matches!(
            loan.apply_edit(&edit, Utc::now()),
            Err(ApiError::Invalid(_))
        ));
    }

    #[test]
    fn edit_only_touches_supplied_text() {
        let mut loan = sample_loan();
        let edit = LoanEdit {
            profile: ProfileEdit {
                hometown: Some("Siem Reap".into()),
                ..ProfileEdit::default()
            },
            ..LoanEdit::default()
        };
        loan.apply_edit(&edit, Utc::now()).unwrap();

        assert_eq!(loan.hometown, "Siem Reap");
        assert_eq!(loan.full_name, "Dara Sok");
    }

    #[test]
    fn replacing_documents_keeps_untouched_paths() {
        let mut loan = sample_loan();
        loan.replace_documents(LoanDocuments {
            id_front: Some("id_cards/new.webp".into()),
            ..LoanDocuments::default()
        });

        assert_eq!(loan.id_front.as_deref(), Some("id_cards/new.webp"));
        assert_eq!(loan.id_back.as_deref(), Some("id_cards/back.webp"));
    }
}
