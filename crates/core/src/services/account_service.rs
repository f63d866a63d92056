use crate::app_state::AppState;
use crate::repositories::account_repository::AccountRepository;
use crate::repositories::withdrawal_repository::WithdrawalRepository;
use crate::services::ledger_service::LedgerService;
use diesel::prelude::*;
use loanline_primitives::error::ApiError;
use loanline_primitives::models::context::RequestContext;
use loanline_primitives::models::dtos::account_dto::{
    AccountResponse, AccountStatusResponse, RealtimeState, StaffAccountUpdate, WithdrawalSnapshot,
};
use loanline_primitives::models::entities::enum_types::LedgerReason;
use tracing::info;
use uuid::Uuid;

pub struct AccountService;

impl AccountService {
    /// Snapshot polled by the wallet page.
    pub async fn realtime_state(
        state: &AppState,
        ctx: &RequestContext,
    ) -> Result<RealtimeState, ApiError> {
        let mut conn = state.db.get()?;
        let account = AccountRepository::get(&mut conn, ctx.account_id)?;
        let last = WithdrawalRepository::latest(&mut conn, ctx.account_id)?;

        Ok(RealtimeState {
            ok: true,
            account_status: account.account_status.to_string().to_lowercase(),
            status_message: account.status_message.trim().to_string(),
            balance: account.balance,
            otp_required: account.staff_otp().is_some(),
            withdrawal: last.map(|w| WithdrawalSnapshot {
                id: w.id,
                status: w.status,
                status_label: w.status.label().to_string(),
                updated_at: w.updated_at,
            }),
        })
    }

    pub async fn status(
        state: &AppState,
        ctx: &RequestContext,
    ) -> Result<AccountStatusResponse, ApiError> {
        let mut conn = state.db.get()?;
        let account = AccountRepository::get(&mut conn, ctx.account_id)?;

        Ok(AccountStatusResponse::from(&account))
    }

    /// Staff edit of status, OTP, score, message, activation and balance.
    /// Everything is parsed before the row is locked.
    pub async fn staff_update(
        state: &AppState,
        ctx: &RequestContext,
        account_id: Uuid,
        update: StaffAccountUpdate,
    ) -> Result<AccountResponse, ApiError> {
        ctx.ensure_staff()?;
        let mut edit = update.into_edit()?;
        edit.changes.updated_at = Some(ctx.now);

        let mut conn = state.db.get()?;
        let account = conn.transaction::<_, ApiError, _>(|conn| {
            let mut account = AccountRepository::find_by_id_for_update(conn, account_id)?;

            if let Some(target) = edit.balance {
                let delta = target - account.balance;
                LedgerService::post(
                    conn,
                    &mut account,
                    delta,
                    LedgerReason::StaffAdjustment,
                    None,
                    ctx.now,
                )?;
            }

            AccountRepository::update(conn, account.id, &edit.changes)
        })?;

        info!(
            staff_id = %ctx.account_id,
            account_id = %account.id,
            account_status = %account.account_status,
            balance = %account.balance,
            "account.staff_updated"
        );
        Ok(account.into())
    }
}
