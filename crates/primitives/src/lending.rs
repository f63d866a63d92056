//! Pure lending rules: repayment arithmetic, term checks, balance effects of
//! loan and withdrawal transitions, and the repayment calendar. Nothing here
//! touches the database, so every rule is exercised directly by unit tests.

use crate::error::ApiError;
use crate::models::entities::enum_types::{LoanStatus, WithdrawalStatus};
use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

pub const ALLOWED_TERMS: [i32; 6] = [6, 12, 24, 36, 48, 60];

/// Days between approval and the first installment.
pub const FIRST_INSTALLMENT_AFTER_DAYS: i64 = 15;

/// Money columns are NUMERIC(14, 2).
pub const MONEY_SCALE: u32 = 2;

/// Rate columns are NUMERIC(10, 6).
pub const RATE_SCALE: u32 = 6;

/// Exclusive upper bound of a NUMERIC(14, 2) value.
pub fn money_limit() -> Decimal {
    Decimal::new(1_000_000_000_000, 0)
}

/// Exclusive upper bound of a NUMERIC(10, 6) value.
pub fn rate_limit() -> Decimal {
    Decimal::new(10_000, 0)
}

/// What happens to the balance when a previously approved loan leaves APPROVED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ApprovalReversal {
    /// Approval credit stays with the customer.
    #[default]
    Keep,
    /// Approval credit is debited back.
    Debit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceEffect {
    Unchanged,
    Credit(Decimal),
    Debit(Decimal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefundDecision {
    /// Credit the withdrawal amount back in this update.
    pub refund: bool,
    /// Value the refunded flag takes after the update.
    pub refunded: bool,
}

pub fn ensure_allowed_term(term_months: i32) -> Result<i32, ApiError> {
    if ALLOWED_TERMS.contains(&term_months) {
        Ok(term_months)
    } else {
        Err(ApiError::Invalid(format!(
            "Invalid loan term {} (allowed: 6/12/24/36/48/60)",
            term_months
        )))
    }
}

pub fn parse_decimal(raw: &str, field: &str) -> Result<Decimal, ApiError> {
    Decimal::from_str(raw.trim()).map_err(|_| ApiError::Invalid(format!("Invalid {}", field)))
}

/// True when `value` is storable in a money column without rounding.
pub fn is_money(value: Decimal) -> bool {
    value.normalize().scale() <= MONEY_SCALE && value.abs() < money_limit()
}

/// Parses a money input. More than two decimals or an out-of-range value is
/// refused rather than rounded.
pub fn parse_money(raw: &str, field: &str) -> Result<Decimal, ApiError> {
    let value = parse_decimal(raw, field)?;
    if value.normalize().scale() > MONEY_SCALE {
        return Err(ApiError::Invalid(format!(
            "Invalid {}: at most {} decimal places",
            field, MONEY_SCALE
        )));
    }
    if value.abs() >= money_limit() {
        return Err(ApiError::Invalid(format!("Invalid {}: out of range", field)));
    }
    Ok(value)
}

pub fn check_rate(rate: Decimal) -> Result<Decimal, ApiError> {
    if rate < Decimal::ZERO {
        return Err(ApiError::Invalid("Interest rate must not be negative".into()));
    }
    if rate.normalize().scale() > RATE_SCALE || rate >= rate_limit() {
        return Err(ApiError::Invalid(format!(
            "Interest rate must be below {} with at most {} decimal places",
            rate_limit(),
            RATE_SCALE
        )));
    }
    Ok(rate)
}

pub fn parse_rate(raw: &str) -> Result<Decimal, ApiError> {
    check_rate(parse_decimal(raw, "interest rate")?)
}

pub fn parse_int(raw: &str, field: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ApiError::Invalid(format!("Invalid {}", field)))
}

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Flat simple-interest installment: `(amount + amount * rate * term) / term`.
pub fn monthly_repayment(
    amount: Decimal,
    rate_monthly: Decimal,
    term_months: i32,
) -> Result<Decimal, ApiError> {
    if term_months <= 0 {
        return Err(ApiError::Invalid("Loan term must be positive".into()));
    }
    let term = Decimal::from(term_months);
    let out_of_range = || ApiError::Invalid("Monthly repayment is out of range".into());

    let interest = amount
        .checked_mul(rate_monthly)
        .and_then(|v| v.checked_mul(term))
        .ok_or_else(out_of_range)?;
    let installment = amount
        .checked_add(interest)
        .and_then(|total| total.checked_div(term))
        .map(round_money)
        .ok_or_else(out_of_range)?;

    if !is_money(installment) {
        return Err(out_of_range());
    }
    Ok(installment)
}

pub fn approval_effect(
    previous: LoanStatus,
    next: LoanStatus,
    amount: Decimal,
    policy: ApprovalReversal,
) -> BalanceEffect {
    match (previous, next) {
        (p, LoanStatus::Approved) if p != LoanStatus::Approved => BalanceEffect::Credit(amount),
        (LoanStatus::Approved, n) if n != LoanStatus::Approved => match policy {
            ApprovalReversal::Keep => BalanceEffect::Unchanged,
            ApprovalReversal::Debit => BalanceEffect::Debit(amount),
        },
        _ => BalanceEffect::Unchanged,
    }
}

/// A refund fires at most once: when staff reject the request or tick the
/// refunded box while it is still unrefunded. Once set, the flag never clears.
pub fn refund_decision(
    already_refunded: bool,
    new_status: Option<WithdrawalStatus>,
    want_refunded: bool,
) -> RefundDecision {
    if already_refunded {
        return RefundDecision {
            refund: false,
            refunded: true,
        };
    }

    let rejected = new_status == Some(WithdrawalStatus::Rejected);
    if rejected || want_refunded {
        RefundDecision {
            refund: true,
            refunded: true,
        }
    } else {
        RefundDecision {
            refund: false,
            refunded: false,
        }
    }
}

/// Status shown to the customer: a PENDING loan that has waited at least
/// `review_after_hours` is presented as REVIEW. Nothing is persisted.
pub fn displayed_loan_status(
    status: LoanStatus,
    created_at: DateTime<Utc>,
    now: DateTime<Utc>,
    review_after_hours: i64,
) -> LoanStatus {
    if status == LoanStatus::Pending && now - created_at >= Duration::hours(review_after_hours) {
        LoanStatus::Review
    } else {
        status
    }
}

/// Due dates of each installment: the first lands 15 days after `start`, the
/// rest on the same calendar day of each following month (clamped to month end).
pub fn installment_dates(start: DateTime<Utc>, term_months: i32) -> Vec<NaiveDate> {
    let first_due = start + Duration::days(FIRST_INSTALLMENT_AFTER_DAYS);

    (0..term_months.max(0) as u32)
        .filter_map(|i| first_due.checked_add_months(Months::new(i)))
        .map(|due| due.date_naive())
        .collect()
}
