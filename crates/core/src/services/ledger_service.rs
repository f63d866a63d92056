use crate::repositories::account_repository::AccountRepository;
use crate::repositories::ledger_repository::LedgerRepository;
use chrono::{DateTime, Utc};
use diesel::PgConnection;
use loanline_primitives::error::ApiError;
use loanline_primitives::lending::{is_money, BalanceEffect};
use loanline_primitives::models::entities::account::Account;
use loanline_primitives::models::entities::balance_ledger::NewBalanceLedgerEntry;
use loanline_primitives::models::entities::enum_types::LedgerReason;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

pub struct LedgerService;

impl LedgerService {
    /// Moves `delta` onto an account row the caller has already locked, and
    /// journals the movement. Must run inside the caller's transaction.
    pub fn post(
        conn: &mut PgConnection,
        account: &mut Account,
        delta: Decimal,
        reason: LedgerReason,
        reference_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        if delta.is_zero() {
            return Ok(());
        }

        let balance = account.balance + delta;
        if !is_money(delta) || !is_money(balance) {
            return Err(ApiError::Invalid(format!(
                "Balance movement {} does not fit a money column",
                delta
            )));
        }
        AccountRepository::set_balance(conn, account.id, balance, now)?;
        LedgerRepository::append(
            conn,
            NewBalanceLedgerEntry {
                account_id: account.id,
                amount: delta,
                reason,
                reference_id,
            },
        )?;

        info!(
            account_id = %account.id,
            %delta,
            %reason,
            %balance,
            "ledger.post"
        );
        account.balance = balance;
        account.updated_at = now;
        Ok(())
    }

    /// Applies the balance side of a loan status change.
    pub fn apply_loan_effect(
        conn: &mut PgConnection,
        account: &mut Account,
        effect: BalanceEffect,
        loan_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        match effect {
            BalanceEffect::Unchanged => Ok(()),
            BalanceEffect::Credit(amount) => Self::post(
                conn,
                account,
                amount,
                LedgerReason::LoanApproval,
                Some(loan_id),
                now,
            ),
            BalanceEffect::Debit(amount) => Self::post(
                conn,
                account,
                -amount,
                LedgerReason::LoanApprovalReversal,
                Some(loan_id),
                now,
            ),
        }
    }
}
