use crate::app_state::AppState;
use crate::repositories::account_repository::AccountRepository;
use crate::repositories::withdrawal_repository::WithdrawalRepository;
use crate::services::ledger_service::LedgerService;
use diesel::prelude::*;
use loanline_primitives::error::{ApiError, WithdrawalRejection};
use loanline_primitives::models::context::RequestContext;
use loanline_primitives::models::dtos::common_dto::{ListQuery, Page, PAGE_SIZE};
use loanline_primitives::models::dtos::withdrawal_dto::{
    CreateWithdrawalRequest, OtpCheckResponse, StaffWithdrawalRow, StaffWithdrawalUpdate,
    VerifyOtpRequest, WithdrawalHistoryResponse, WithdrawalOutcome, WithdrawalResponse,
    WithdrawalStatusResponse,
};
use loanline_primitives::models::entities::account::Account;
use loanline_primitives::models::entities::enum_types::{LedgerReason, WithdrawalStatus};
use loanline_primitives::models::entities::withdrawal::NewWithdrawalRequest;
use tracing::{info, warn};
use uuid::Uuid;

pub struct WithdrawalService;

/// The supplied OTP must be present and equal the one staff gave the account.
fn check_otp(account: &Account, supplied: Option<&str>) -> Result<(), WithdrawalRejection> {
    let supplied = supplied.ok_or(WithdrawalRejection::OtpRequired)?;
    match account.staff_otp() {
        Some(expected) if expected == supplied => Ok(()),
        _ => Err(WithdrawalRejection::OtpWrong),
    }
}

impl WithdrawalService {
    /// Debits the balance and opens a request in `processing`. All checks
    /// run against the locked account row, in a fixed order.
    pub async fn create(
        state: &AppState,
        ctx: &RequestContext,
        req: CreateWithdrawalRequest,
    ) -> Result<WithdrawalOutcome, ApiError> {
        let currency = state.config.lending.withdrawal_currency.as_str();
        let mut conn = state.db.get()?;

        let outcome = conn.transaction::<_, ApiError, _>(|conn| {
            let mut account = AccountRepository::find_by_id_for_update(conn, ctx.account_id)?;

            if !account.can_withdraw() {
                return Err(WithdrawalRejection::AccountNotActive.into());
            }
            check_otp(&account, req.otp())?;

            if WithdrawalRepository::find_open(conn, account.id)?.is_some() {
                return Ok(WithdrawalOutcome {
                    ok: true,
                    already: true,
                    withdrawal: None,
                    balance: account.balance,
                });
            }

            if account.balance <= rust_decimal::Decimal::ZERO {
                return Err(WithdrawalRejection::Insufficient.into());
            }
            let amount = req.parse_amount()?;
            if amount > account.balance {
                return Err(WithdrawalRejection::Exceed.into());
            }

            let withdrawal = WithdrawalRepository::create(
                conn,
                NewWithdrawalRequest {
                    account_id: account.id,
                    amount,
                    currency,
                    status: WithdrawalStatus::Processing,
                },
            )?;
            LedgerService::post(
                conn,
                &mut account,
                -amount,
                LedgerReason::WithdrawalDebit,
                Some(withdrawal.id),
                ctx.now,
            )?;

            Ok(WithdrawalOutcome {
                ok: true,
                already: false,
                withdrawal: Some(withdrawal.into()),
                balance: account.balance,
            })
        });

        match &outcome {
            Ok(o) if o.already => {
                info!(account_id = %ctx.account_id, "withdrawal.create: open request exists")
            }
            Ok(o) => info!(
                account_id = %ctx.account_id,
                withdrawal_id = ?o.withdrawal.as_ref().map(|w| w.id),
                balance = %o.balance,
                "withdrawal.created"
            ),
            Err(ApiError::Withdrawal(reason)) => {
                warn!(account_id = %ctx.account_id, reason = %reason, "withdrawal.create: refused")
            }
            Err(_) => {}
        }
        outcome
    }

    /// OTP pre-check for the wallet page; nothing is created.
    pub async fn verify_otp(
        state: &AppState,
        ctx: &RequestContext,
        req: VerifyOtpRequest,
    ) -> Result<OtpCheckResponse, ApiError> {
        let mut conn = state.db.get()?;
        let account = AccountRepository::get(&mut conn, ctx.account_id)?;

        let supplied = req.otp.as_deref().map(str::trim).filter(|o| !o.is_empty());
        check_otp(&account, supplied)?;

        Ok(OtpCheckResponse { ok: true })
    }

    pub async fn latest_status(
        state: &AppState,
        ctx: &RequestContext,
    ) -> Result<WithdrawalStatusResponse, ApiError> {
        let mut conn = state.db.get()?;
        Ok(WithdrawalRepository::latest(&mut conn, ctx.account_id)?.into())
    }

    pub async fn history(
        state: &AppState,
        ctx: &RequestContext,
    ) -> Result<WithdrawalHistoryResponse, ApiError> {
        let mut conn = state.db.get()?;
        let items = WithdrawalRepository::history(&mut conn, ctx.account_id)?
            .into_iter()
            .map(WithdrawalResponse::from)
            .collect();

        Ok(WithdrawalHistoryResponse { items })
    }

    /// Staff edit under a row lock. A refund credits the owner at most once.
    pub async fn staff_update(
        state: &AppState,
        ctx: &RequestContext,
        withdrawal_id: Uuid,
        update: StaffWithdrawalUpdate,
    ) -> Result<WithdrawalResponse, ApiError> {
        ctx.ensure_staff()?;
        let edit = update.validate()?;

        let mut conn = state.db.get()?;
        let (withdrawal, refunded_now) = conn.transaction::<_, ApiError, _>(|conn| {
            let mut withdrawal = WithdrawalRepository::find_by_id_for_update(conn, withdrawal_id)?;
            let refund = withdrawal.apply_staff_edit(&edit, ctx.now);

            if let Some(amount) = refund {
                let mut account =
                    AccountRepository::find_by_id_for_update(conn, withdrawal.account_id)?;
                LedgerService::post(
                    conn,
                    &mut account,
                    amount,
                    LedgerReason::WithdrawalRefund,
                    Some(withdrawal.id),
                    ctx.now,
                )?;
            }

            let saved = WithdrawalRepository::save(conn, &withdrawal)?;
            Ok((saved, refund))
        })?;

        info!(
            staff_id = %ctx.account_id,
            withdrawal_id = %withdrawal.id,
            status = %withdrawal.status,
            refunded = withdrawal.refunded,
            refund = ?refunded_now,
            "withdrawal.staff_updated"
        );
        Ok(withdrawal.into())
    }

    pub async fn staff_list(
        state: &AppState,
        ctx: &RequestContext,
        query: ListQuery,
    ) -> Result<Page<StaffWithdrawalRow>, ApiError> {
        ctx.ensure_staff()?;
        let status = query
            .status_filter()
            .map(WithdrawalStatus::parse)
            .transpose()?;
        let pattern = query.phone_pattern();

        let mut conn = state.db.get()?;
        let (rows, total) = WithdrawalRepository::list(
            &mut conn,
            status,
            pattern.as_deref(),
            query.offset(),
            PAGE_SIZE,
        )?;

        Ok(Page {
            items: rows
                .into_iter()
                .map(|(withdrawal, phone)| StaffWithdrawalRow {
                    phone,
                    withdrawal: withdrawal.into(),
                })
                .collect(),
            page: query.page(),
            per_page: PAGE_SIZE,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use loanline_primitives::models::entities::enum_types::AccountStatus;
    use rust_decimal::Decimal;

    fn account(otp: &str) -> Account {
        let now = Utc::now();
        Account {
            id: Uuid::new_v4(),
            phone: "09170000001".into(),
            balance: Decimal::ONE_THOUSAND,
            account_status: AccountStatus::Active,
            status_message: String::new(),
            withdraw_otp: otp.into(),
            credit_score: 600,
            is_staff: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn otp_checks() {
        let acc = account(" 4455 ");
        assert_eq!(check_otp(&acc, None), Err(WithdrawalRejection::OtpRequired));
        assert_eq!(check_otp(&acc, Some("1111")), Err(WithdrawalRejection::OtpWrong));
        assert_eq!(check_otp(&acc, Some("4455")), Ok(()));
    }

    #[test]
    fn unset_staff_otp_never_matches() {
        let acc = account("");
        assert_eq!(check_otp(&acc, Some("")), Err(WithdrawalRejection::OtpWrong));
        assert_eq!(check_otp(&acc, Some("0000")), Err(WithdrawalRejection::OtpWrong));
    }
}
