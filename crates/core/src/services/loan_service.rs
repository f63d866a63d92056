use crate::app_state::AppState;
use crate::media::{self, decode_signature, ImageNormalizer};
use crate::repositories::account_repository::AccountRepository;
use crate::repositories::loan_repository::LoanRepository;
use crate::repositories::payment_method_repository::PaymentMethodRepository;
use crate::services::ledger_service::LedgerService;
use crate::services::loan_config_service::LoanConfigService;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use loanline_primitives::error::ApiError;
use loanline_primitives::lending::{
    approval_effect, displayed_loan_status, installment_dates, monthly_repayment, ApprovalReversal,
};
use loanline_primitives::models::context::RequestContext;
use loanline_primitives::models::dtos::common_dto::{ListQuery, Page, PAGE_SIZE};
use loanline_primitives::models::dtos::loan_dto::{
    LoanApplicationForm, LoanResponse, LoanStatusView, RepaymentScheduleResponse, ScheduleEntry,
    StaffLoanRow, StaffLoanStatusRequest, StaffLoanUpdate,
};
use loanline_primitives::models::dtos::upload_dto::Upload;
use loanline_primitives::models::entities::account::Account;
use loanline_primitives::models::entities::enum_types::LoanStatus;
use loanline_primitives::models::entities::loan::{
    LoanApplication, LoanDocuments, NewLoanApplication,
};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

const OUTSTANDING: &str = "You already have a loan application in progress";

pub struct LoanService;

impl LoanService {
    /// Validates, prices and stores a new application in PENDING. The rate is
    /// copied from the configuration in force at this moment.
    pub async fn submit(
        state: &AppState,
        ctx: &RequestContext,
        form: LoanApplicationForm,
    ) -> Result<LoanResponse, ApiError> {
        let mut conn = state.db.get()?;

        if LoanRepository::find_outstanding(&mut conn, ctx.account_id)?.is_some() {
            return Err(ApiError::Conflict(OUTSTANDING.into()));
        }

        let terms = LoanConfigService::terms(&mut conn)?;
        let application = form.validate(&terms)?;
        let signature = decode_signature(&form.signature_data)?;

        let rate = terms.interest_rate_monthly;
        let repayment = monthly_repayment(application.amount, rate, application.term_months)?;

        let store = state.media.as_ref();
        let docs = LoanDocuments {
            income_proof: form
                .income_proof
                .as_ref()
                .filter(|u| !u.is_empty())
                .map(|u| media::store_document(store, "income_proofs", u))
                .transpose()?,
            id_front: Some(media::store_image(store, "id_cards", required(&form.id_front)?)?),
            id_back: Some(media::store_image(store, "id_cards", required(&form.id_back)?)?),
            selfie_with_id: Some(media::store_image(
                store,
                "selfies",
                required(&form.selfie_with_id)?,
            )?),
            signature_image: Some(media::store_signature(
                store,
                &format!("signature_{}", ctx.account_id),
                &signature,
            )?),
        };

        let profile = application.profile;
        let new_loan = NewLoanApplication {
            account_id: ctx.account_id,
            full_name: profile.full_name,
            age: application.age,
            current_living: profile.current_living,
            hometown: profile.hometown,
            income: profile.income,
            monthly_expenses: profile.monthly_expenses,
            guarantor_contact: profile.guarantor_contact,
            guarantor_current_living: profile.guarantor_current_living,
            identity_name: profile.identity_name,
            identity_number: profile.identity_number,
            loan_purposes: Value::from(profile.loan_purposes),
            income_proof: docs.income_proof,
            id_front: docs.id_front,
            id_back: docs.id_back,
            selfie_with_id: docs.selfie_with_id,
            signature_image: docs.signature_image,
            amount: application.amount,
            term_months: application.term_months,
            interest_rate_monthly: rate,
            monthly_repayment: repayment,
            status: LoanStatus::Pending,
        };

        let loan = conn.transaction::<_, ApiError, _>(|conn| {
            // Serializes concurrent submissions from the same account.
            AccountRepository::find_by_id_for_update(conn, ctx.account_id)?;

            if LoanRepository::find_outstanding(conn, ctx.account_id)?.is_some() {
                return Err(ApiError::Conflict(OUTSTANDING.into()));
            }
            LoanRepository::create(conn, new_loan)
        })?;

        info!(
            account_id = %ctx.account_id,
            loan_id = %loan.id,
            amount = %loan.amount,
            term_months = loan.term_months,
            "loan.submitted"
        );
        Ok(loan.into())
    }

    /// Latest application that is not rejected.
    pub async fn current(state: &AppState, ctx: &RequestContext) -> Result<LoanResponse, ApiError> {
        let mut conn = state.db.get()?;

        LoanRepository::find_outstanding(&mut conn, ctx.account_id)?
            .map(LoanResponse::from)
            .ok_or_else(|| ApiError::NotFound("No loan application".into()))
    }

    pub async fn status_view(
        state: &AppState,
        ctx: &RequestContext,
    ) -> Result<LoanStatusView, ApiError> {
        let mut conn = state.db.get()?;

        let Some(loan) = LoanRepository::latest(&mut conn, ctx.account_id)? else {
            return Ok(LoanStatusView::hidden());
        };
        if !PaymentMethodRepository::is_locked(&mut conn, ctx.account_id)? {
            return Ok(LoanStatusView::hidden());
        }

        let shown = displayed_loan_status(
            loan.status,
            loan.created_at,
            ctx.now,
            state.config.lending.review_display_after_hours,
        );

        Ok(LoanStatusView {
            visible: true,
            loan_id: Some(loan.id),
            status: Some(shown),
            status_label: Some(shown.label().to_string()),
            amount: Some(loan.amount),
            term_months: Some(loan.term_months),
        })
    }

    /// Flat installments of the latest approved loan, first one due 15 days
    /// after approval.
    pub async fn schedule(
        state: &AppState,
        ctx: &RequestContext,
    ) -> Result<RepaymentScheduleResponse, ApiError> {
        let mut conn = state.db.get()?;

        let loan = LoanRepository::latest_approved(&mut conn, ctx.account_id)?
            .ok_or_else(|| ApiError::NotFound("No approved loan".into()))?;

        Ok(build_schedule(&loan))
    }

    /// Full staff edit. Every field is parsed and every upload stored before
    /// the rows are locked; any failure leaves the loan untouched.
    pub async fn staff_update(
        state: &AppState,
        ctx: &RequestContext,
        loan_id: Uuid,
        update: StaffLoanUpdate,
    ) -> Result<LoanResponse, ApiError> {
        ctx.ensure_staff()?;
        let edit = update.validate()?;

        let signature = update
            .signature_data
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(decode_signature)
            .transpose()?;
        let docs = store_replacements(state.media.as_ref(), loan_id, &update, signature)?;

        let policy = state.config.lending.approval_reversal;
        let mut conn = state.db.get()?;

        let loan = conn.transaction::<_, ApiError, _>(|conn| {
            let mut loan = LoanRepository::find_by_id_for_update(conn, loan_id)?;
            let mut account = AccountRepository::find_by_id_for_update(conn, loan.account_id)?;

            if let Some(phone) = edit.phone.as_deref() {
                change_phone(conn, &mut account, phone, ctx.now)?;
            }

            let previous = loan.apply_edit(&edit, ctx.now)?;
            loan.replace_documents(docs);
            settle_transition(conn, &loan, &mut account, previous, policy, ctx.now)?;

            LoanRepository::save(conn, &loan)
        })?;

        info!(
            staff_id = %ctx.account_id,
            loan_id = %loan.id,
            status = %loan.status,
            monthly_repayment = %loan.monthly_repayment,
            "loan.staff_updated"
        );
        Ok(loan.into())
    }

    pub async fn staff_set_status(
        state: &AppState,
        ctx: &RequestContext,
        loan_id: Uuid,
        req: StaffLoanStatusRequest,
    ) -> Result<LoanResponse, ApiError> {
        ctx.ensure_staff()?;
        let next = LoanStatus::parse(&req.status)?;
        let policy = state.config.lending.approval_reversal;

        let mut conn = state.db.get()?;
        let loan = conn.transaction::<_, ApiError, _>(|conn| {
            let mut loan = LoanRepository::find_by_id_for_update(conn, loan_id)?;
            let mut account = AccountRepository::find_by_id_for_update(conn, loan.account_id)?;

            let previous = loan.apply_status(next, ctx.now);
            loan.updated_at = ctx.now;
            settle_transition(conn, &loan, &mut account, previous, policy, ctx.now)?;

            LoanRepository::save(conn, &loan)
        })?;

        info!(
            staff_id = %ctx.account_id,
            loan_id = %loan.id,
            status = %loan.status,
            "loan.status_set"
        );
        Ok(loan.into())
    }

    pub async fn staff_list(
        state: &AppState,
        ctx: &RequestContext,
        query: ListQuery,
    ) -> Result<Page<StaffLoanRow>, ApiError> {
        ctx.ensure_staff()?;
        let status = query.status_filter().map(LoanStatus::parse).transpose()?;
        let pattern = query.phone_pattern();

        let mut conn = state.db.get()?;
        let (rows, total) = LoanRepository::list(
            &mut conn,
            status,
            pattern.as_deref(),
            query.offset(),
            PAGE_SIZE,
        )?;

        Ok(Page {
            items: rows
                .into_iter()
                .map(|(loan, phone)| StaffLoanRow {
                    phone,
                    loan: loan.into(),
                })
                .collect(),
            page: query.page(),
            per_page: PAGE_SIZE,
            total,
        })
    }
}

pub fn build_schedule(loan: &LoanApplication) -> RepaymentScheduleResponse {
    let start: DateTime<Utc> = loan.approved_at.unwrap_or(loan.created_at);

    let entries = installment_dates(start, loan.term_months)
        .into_iter()
        .enumerate()
        .map(|(i, due_date)| ScheduleEntry {
            installment: i as u32 + 1,
            due_date,
            amount: loan.monthly_repayment,
        })
        .collect();

    RepaymentScheduleResponse {
        loan_id: loan.id,
        starts_from: start,
        term_months: loan.term_months,
        monthly_repayment: loan.monthly_repayment,
        entries,
    }
}

fn required(upload: &Option<Upload>) -> Result<&Upload, ApiError> {
    upload
        .as_ref()
        .ok_or_else(|| ApiError::Invalid("Missing required image".into()))
}

fn store_replacements(
    store: &dyn ImageNormalizer,
    loan_id: Uuid,
    update: &StaffLoanUpdate,
    signature: Option<Vec<u8>>,
) -> Result<LoanDocuments, ApiError> {
    let image = |category: &str, upload: &Option<Upload>| {
        upload
            .as_ref()
            .filter(|u| !u.is_empty())
            .map(|u| media::store_image(store, category, u))
            .transpose()
    };

    Ok(LoanDocuments {
        income_proof: update
            .income_proof
            .as_ref()
            .filter(|u| !u.is_empty())
            .map(|u| media::store_document(store, "income_proofs", u))
            .transpose()?,
        id_front: image("id_cards", &update.id_front)?,
        id_back: image("id_cards", &update.id_back)?,
        selfie_with_id: image("selfies", &update.selfie_with_id)?,
        signature_image: signature
            .map(|bytes| {
                media::store_signature(
                    store,
                    &format!("signature_{}_{}", loan_id, Uuid::new_v4().simple()),
                    &bytes,
                )
            })
            .transpose()?,
    })
}

fn change_phone(
    conn: &mut PgConnection,
    account: &mut Account,
    phone: &str,
    now: DateTime<Utc>,
) -> Result<(), ApiError> {
    if account.phone == phone {
        return Ok(());
    }
    if let Some(other) = AccountRepository::find_by_phone(conn, phone)? {
        if other.id != account.id {
            warn!(account_id = %account.id, "loan.staff_update: phone already in use");
            return Err(ApiError::Conflict("Phone number already in use".into()));
        }
    }

    AccountRepository::set_phone(conn, account.id, phone, now)?;
    account.phone = phone.to_string();
    Ok(())
}

/// Books the balance side of a status change made on a locked loan.
fn settle_transition(
    conn: &mut PgConnection,
    loan: &LoanApplication,
    account: &mut Account,
    previous: LoanStatus,
    policy: ApprovalReversal,
    now: DateTime<Utc>,
) -> Result<(), ApiError> {
    let effect = approval_effect(previous, loan.status, loan.amount, policy);
    LedgerService::apply_loan_effect(conn, account, effect, loan.id, now)?;

    if previous != loan.status {
        info!(
            loan_id = %loan.id,
            account_id = %account.id,
            from = %previous,
            to = %loan.status,
            ?effect,
            "loan.transition"
        );
    }
    Ok(())
}
