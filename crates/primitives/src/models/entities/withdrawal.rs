use crate::lending::refund_decision;
use crate::models::dtos::withdrawal_dto::WithdrawalEdit;
use crate::models::entities::account::Account;
use crate::models::entities::enum_types::WithdrawalStatus;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations, Serialize)]
#[diesel(table_name = crate::schema::withdrawal_requests)]
#[diesel(belongs_to(Account))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WithdrawalRequest {
    pub id: Uuid,
    pub account_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub status: WithdrawalStatus,
    pub otp_required: bool,
    #[serde(skip_serializing)]
    pub staff_otp: String,
    pub refunded: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WithdrawalRequest {
    /// Applies a staff edit and returns the amount to credit back, if a
    /// refund fires. `refunded` never goes from true back to false.
    pub fn apply_staff_edit(&mut self, edit: &WithdrawalEdit, now: DateTime<Utc>) -> Option<Decimal> {
        let decision = refund_decision(self.refunded, edit.status, edit.refunded);

        if let Some(status) = edit.status {
            self.status = status;
        }
        self.otp_required = edit.otp_required;
        self.staff_otp = edit.staff_otp.clone();
        self.refunded = decision.refunded;
        self.updated_at = now;

        (decision.refund && self.amount > Decimal::ZERO).then_some(self.amount)
    }

    pub fn changeset(&self) -> WithdrawalChangeset<'_> {
        WithdrawalChangeset {
            status: self.status,
            otp_required: self.otp_required,
            staff_otp: &self.staff_otp,
            refunded: self.refunded,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::withdrawal_requests)]
pub struct NewWithdrawalRequest<'a> {
    pub account_id: Uuid,
    pub amount: Decimal,
    pub currency: &'a str,
    pub status: WithdrawalStatus,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = crate::schema::withdrawal_requests)]
pub struct WithdrawalChangeset<'a> {
    pub status: WithdrawalStatus,
    pub otp_required: bool,
    pub staff_otp: &'a str,
    pub refunded: bool,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(amount: Decimal) -> WithdrawalRequest {
        let now = Utc::now();
        WithdrawalRequest {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            amount,
            currency: "PHP".into(),
            status: WithdrawalStatus::Processing,
            otp_required: false,
            staff_otp: String::new(),
            refunded: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn edit(status: Option<WithdrawalStatus>, refunded: bool) -> WithdrawalEdit {
        WithdrawalEdit {
            status,
            otp_required: false,
            staff_otp: String::new(),
            refunded,
        }
    }

    #[test]
    fn rejection_refunds_once() {
        let mut w = request(dec!(500));

        let first = w.apply_staff_edit(&edit(Some(WithdrawalStatus::Rejected), false), Utc::now());
        assert_eq!(first, Some(dec!(500)));
        assert!(w.refunded);

        let second = w.apply_staff_edit(&edit(Some(WithdrawalStatus::Rejected), false), Utc::now());
        assert_eq!(second, None);
        assert!(w.refunded);
    }

    #[test]
    fn manual_refund_then_rejection_does_not_credit_twice() {
        let mut w = request(dec!(120.50));

        assert_eq!(w.apply_staff_edit(&edit(None, true), Utc::now()), Some(dec!(120.50)));
        assert_eq!(
            w.apply_staff_edit(&edit(Some(WithdrawalStatus::Rejected), true), Utc::now()),
            None
        );
    }

    #[test]
    fn refunded_flag_cannot_be_cleared() {
        let mut w = request(dec!(10));
        w.apply_staff_edit(&edit(None, true), Utc::now());
        w.apply_staff_edit(&edit(Some(WithdrawalStatus::Waiting), false), Utc::now());

        assert!(w.refunded);
        assert_eq!(w.status, WithdrawalStatus::Waiting);
    }

    #[test]
    fn otp_fields_are_free_form() {
        let mut w = request(dec!(10));
        let update = WithdrawalEdit {
            status: Some(WithdrawalStatus::Reviewed),
            otp_required: true,
            staff_otp: "884211".into(),
            refunded: false,
        };

        assert_eq!(w.apply_staff_edit(&update, Utc::now()), None);
        assert!(w.otp_required);
        assert_eq!(w.staff_otp, "884211");
        assert!(!w.refunded);
    }

    #[test]
    fn zero_amount_marks_refunded_without_credit() {
        let mut w = request(Decimal::ZERO);
        assert_eq!(
            w.apply_staff_edit(&edit(Some(WithdrawalStatus::Rejected), false), Utc::now()),
            None
        );
        assert!(w.refunded);
    }
}
