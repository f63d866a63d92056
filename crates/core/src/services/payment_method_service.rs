use crate::app_state::AppState;
use crate::repositories::account_repository::AccountRepository;
use crate::repositories::payment_method_repository::PaymentMethodRepository;
use diesel::prelude::*;
use loanline_primitives::error::ApiError;
use loanline_primitives::models::context::RequestContext;
use loanline_primitives::models::dtos::payment_method_dto::{
    PaymentMethodResponse, SavePaymentMethodRequest, StaffPaymentMethodUpdate,
};
use loanline_primitives::models::entities::payment_method::{NewPaymentMethod, PayoutDetails};
use tracing::{info, warn};
use uuid::Uuid;

pub struct PaymentMethodService;

impl PaymentMethodService {
    /// Customer save: exactly one complete payout channel, locked afterwards.
    pub async fn save(
        state: &AppState,
        ctx: &RequestContext,
        req: SavePaymentMethodRequest,
    ) -> Result<PaymentMethodResponse, ApiError> {
        let details = req.details();
        let channel = details.channel()?;

        let mut conn = state.db.get()?;
        let saved = conn.transaction::<_, ApiError, _>(|conn| {
            match PaymentMethodRepository::find_by_account_for_update(conn, ctx.account_id)? {
                Some(existing) if existing.locked => {
                    warn!(account_id = %ctx.account_id, "payment_method.save: locked");
                    Err(ApiError::Conflict(
                        "Payment method is locked. Please contact staff to update.".into(),
                    ))
                }
                Some(existing) => {
                    PaymentMethodRepository::update(conn, existing.id, &details, true, ctx.now)
                }
                None => PaymentMethodRepository::create(
                    conn,
                    NewPaymentMethod::from_details(ctx.account_id, &details, true),
                ),
            }
        })?;

        info!(account_id = %ctx.account_id, %channel, "payment_method.saved");
        Ok(saved.into())
    }

    pub async fn get(
        state: &AppState,
        ctx: &RequestContext,
    ) -> Result<PaymentMethodResponse, ApiError> {
        let mut conn = state.db.get()?;

        PaymentMethodRepository::find_by_account(&mut conn, ctx.account_id)?
            .map(PaymentMethodResponse::from)
            .ok_or_else(|| ApiError::NotFound("No payment method saved".into()))
    }

    /// Staff override for the account's payment method, creating it if absent.
    pub async fn staff_update(
        state: &AppState,
        ctx: &RequestContext,
        account_id: Uuid,
        update: StaffPaymentMethodUpdate,
    ) -> Result<PaymentMethodResponse, ApiError> {
        ctx.ensure_staff()?;

        let mut conn = state.db.get()?;
        let saved = conn.transaction::<_, ApiError, _>(|conn| {
            AccountRepository::find_by_id_for_update(conn, account_id)?;

            match PaymentMethodRepository::find_by_account_for_update(conn, account_id)? {
                Some(existing) => {
                    let details = update.merged_onto(existing.details())?;
                    let locked = update.locked.unwrap_or(existing.locked);
                    PaymentMethodRepository::update(conn, existing.id, &details, locked, ctx.now)
                }
                None => {
                    let details = update.merged_onto(PayoutDetails::default())?;
                    PaymentMethodRepository::create(
                        conn,
                        NewPaymentMethod::from_details(
                            account_id,
                            &details,
                            update.locked.unwrap_or(false),
                        ),
                    )
                }
            }
        })?;

        info!(
            staff_id = %ctx.account_id,
            %account_id,
            locked = saved.locked,
            "payment_method.staff_updated"
        );
        Ok(saved.into())
    }
}
