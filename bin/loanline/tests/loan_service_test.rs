use chrono::{Duration, Months, Utc};
use loanline_core::repositories::account_repository::AccountRepository;
use loanline_core::repositories::ledger_repository::LedgerRepository;
use loanline_core::services::loan_config_service::LoanConfigService;
use loanline_core::services::loan_service::LoanService;
use loanline_core::services::payment_method_service::PaymentMethodService;
use loanline_primitives::error::ApiError;
use loanline_primitives::lending::ApprovalReversal;
use loanline_primitives::models::app_state::lending_details::LendingPolicy;
use loanline_primitives::models::context::RequestContext;
use loanline_primitives::models::dtos::config_dto::UpdateLoanConfigRequest;
use loanline_primitives::models::dtos::loan_dto::{StaffLoanStatusRequest, StaffLoanUpdate};
use loanline_primitives::models::dtos::payment_method_dto::SavePaymentMethodRequest;
use loanline_primitives::models::entities::enum_types::{AccountStatus, LedgerReason, LoanStatus};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serial_test::serial;

mod common;

use common::fixtures::{create_account, create_staff, loan_form};

fn status(s: &str) -> StaffLoanStatusRequest {
    StaffLoanStatusRequest { status: s.into() }
}

#[tokio::test]
#[serial]
async fn test_submit_prices_with_snapshot_rate() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, Decimal::ZERO, "", AccountStatus::Active);
    let ctx = common::customer(account.id);

    let loan = LoanService::submit(&state, &ctx, loan_form("1000000", "12"))
        .await
        .unwrap();

    assert_eq!(loan.status, LoanStatus::Pending);
    assert_eq!(loan.interest_rate_monthly, dec!(0.0003));
    assert_eq!(loan.monthly_repayment, dec!(83633.33));
    assert!(loan.signature_image.is_some());

    // later configuration changes do not touch the stored rate
    let staff = create_staff(conn);
    LoanConfigService::update(
        &state,
        &common::staff(staff.id),
        UpdateLoanConfigRequest {
            interest_rate_monthly: "0.01".into(),
            min_amount: "200000".into(),
            max_amount: "60000000".into(),
        },
    )
    .await
    .unwrap();

    let current = LoanService::current(&state, &ctx).await.unwrap();
    assert_eq!(current.interest_rate_monthly, dec!(0.0003));
}

#[tokio::test]
#[serial]
async fn test_submit_rejects_amount_below_minimum() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, Decimal::ZERO, "", AccountStatus::Active);

    let result =
        LoanService::submit(&state, &common::customer(account.id), loan_form("150000", "12")).await;

    assert!(matches!(result, Err(ApiError::Invalid(_))));
    assert!(LoanService::current(&state, &common::customer(account.id))
        .await
        .is_err());
}

#[tokio::test]
#[serial]
async fn test_submit_rejects_unlisted_term_and_bad_signature() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, Decimal::ZERO, "", AccountStatus::Active);
    let ctx = common::customer(account.id);

    let result = LoanService::submit(&state, &ctx, loan_form("1000000", "18")).await;
    assert!(matches!(result, Err(ApiError::Invalid(_))));

    let mut form = loan_form("1000000", "12");
    form.signature_data = "not-an-image".into();
    let result = LoanService::submit(&state, &ctx, form).await;
    assert!(matches!(result, Err(ApiError::Invalid(_))));
}

#[tokio::test]
#[serial]
async fn test_second_submission_conflicts_until_rejected() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, Decimal::ZERO, "", AccountStatus::Active);
    let staff = create_staff(conn);
    let ctx = common::customer(account.id);

    let first = LoanService::submit(&state, &ctx, loan_form("500000", "6"))
        .await
        .unwrap();
    let again = LoanService::submit(&state, &ctx, loan_form("500000", "6")).await;
    assert!(matches!(again, Err(ApiError::Conflict(_))));

    // the outstanding application is reported ahead of field errors
    let invalid = LoanService::submit(&state, &ctx, loan_form("500000", "18")).await;
    assert!(matches!(invalid, Err(ApiError::Conflict(_))));

    LoanService::staff_set_status(&state, &common::staff(staff.id), first.id, status("REJECTED"))
        .await
        .unwrap();

    let retry = LoanService::submit(&state, &ctx, loan_form("500000", "6")).await;
    assert!(retry.is_ok());
}

#[tokio::test]
#[serial]
async fn test_approval_credits_balance_once() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, Decimal::ZERO, "", AccountStatus::Active);
    let staff = common::staff(create_staff(conn).id);

    let loan = LoanService::submit(&state, &common::customer(account.id), loan_form("1000000", "12"))
        .await
        .unwrap();

    let approved = LoanService::staff_set_status(&state, &staff, loan.id, status("APPROVED"))
        .await
        .unwrap();
    assert!(approved.approved_at.is_some());
    LoanService::staff_set_status(&state, &staff, loan.id, status("approved"))
        .await
        .unwrap();

    let account = AccountRepository::get(conn, account.id).unwrap();
    assert_eq!(account.balance, dec!(1000000));

    let credits: Vec<_> = LedgerRepository::for_account(conn, account.id)
        .unwrap()
        .into_iter()
        .filter(|e| e.reason == LedgerReason::LoanApproval)
        .collect();
    assert_eq!(credits.len(), 1);
    assert_eq!(credits[0].reference_id, Some(loan.id));
}

#[tokio::test]
#[serial]
async fn test_leaving_approved_keeps_balance_by_default() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, Decimal::ZERO, "", AccountStatus::Active);
    let staff = common::staff(create_staff(conn).id);

    let loan = LoanService::submit(&state, &common::customer(account.id), loan_form("300000", "6"))
        .await
        .unwrap();
    LoanService::staff_set_status(&state, &staff, loan.id, status("APPROVED"))
        .await
        .unwrap();
    let paid = LoanService::staff_set_status(&state, &staff, loan.id, status("PAID"))
        .await
        .unwrap();

    assert!(paid.approved_at.is_none());
    let account = AccountRepository::get(conn, account.id).unwrap();
    assert_eq!(account.balance, dec!(300000));
}

#[tokio::test]
#[serial]
async fn test_leaving_approved_debits_under_debit_policy() {
    let policy = LendingPolicy {
        approval_reversal: ApprovalReversal::Debit,
        ..LendingPolicy::default()
    };
    let state = common::test_state_with(policy);
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, Decimal::ZERO, "", AccountStatus::Active);
    let staff = common::staff(create_staff(conn).id);

    let loan = LoanService::submit(&state, &common::customer(account.id), loan_form("300000", "6"))
        .await
        .unwrap();
    LoanService::staff_set_status(&state, &staff, loan.id, status("APPROVED"))
        .await
        .unwrap();
    LoanService::staff_set_status(&state, &staff, loan.id, status("REJECTED"))
        .await
        .unwrap();

    let account = AccountRepository::get(conn, account.id).unwrap();
    assert_eq!(account.balance, Decimal::ZERO);
}

#[tokio::test]
#[serial]
async fn test_staff_edit_is_all_or_nothing() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, Decimal::ZERO, "", AccountStatus::Active);
    let staff = common::staff(create_staff(conn).id);

    let loan = LoanService::submit(&state, &common::customer(account.id), loan_form("1000000", "12"))
        .await
        .unwrap();

    let bad = StaffLoanUpdate {
        amount: Some("2000000".into()),
        status: Some("SHIPPED".into()),
        ..StaffLoanUpdate::default()
    };
    let result = LoanService::staff_update(&state, &staff, loan.id, bad).await;
    assert!(matches!(result, Err(ApiError::Invalid(_))));

    let unchanged = LoanService::current(&state, &common::customer(account.id))
        .await
        .unwrap();
    assert_eq!(unchanged.amount, dec!(1000000));
    assert_eq!(unchanged.status, LoanStatus::Pending);

    let good = StaffLoanUpdate {
        amount: Some("1200000".into()),
        term: Some("24".into()),
        status: Some("APPROVED".into()),
        ..StaffLoanUpdate::default()
    };
    let updated = LoanService::staff_update(&state, &staff, loan.id, good)
        .await
        .unwrap();

    // (1200000 + 1200000 * 0.0003 * 24) / 24
    assert_eq!(updated.monthly_repayment, dec!(50360.00));
    assert_eq!(updated.status, LoanStatus::Approved);
    let account = AccountRepository::get(conn, account.id).unwrap();
    assert_eq!(account.balance, dec!(1200000));
}

#[tokio::test]
#[serial]
async fn test_staff_edit_rejects_phone_of_another_account() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, Decimal::ZERO, "", AccountStatus::Active);
    let other = create_account(conn, Decimal::ZERO, "", AccountStatus::Active);
    let staff = common::staff(create_staff(conn).id);

    let loan = LoanService::submit(&state, &common::customer(account.id), loan_form("1000000", "12"))
        .await
        .unwrap();

    let update = StaffLoanUpdate {
        phone: Some(other.phone.clone()),
        ..StaffLoanUpdate::default()
    };
    let result = LoanService::staff_update(&state, &staff, loan.id, update).await;
    assert!(matches!(result, Err(ApiError::Conflict(_))));

    let account = AccountRepository::get(conn, account.id).unwrap();
    assert_ne!(account.phone, other.phone);
}

#[tokio::test]
#[serial]
async fn test_customer_cannot_use_staff_operations() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, Decimal::ZERO, "", AccountStatus::Active);
    let ctx = common::customer(account.id);

    let loan = LoanService::submit(&state, &ctx, loan_form("1000000", "12"))
        .await
        .unwrap();
    let result = LoanService::staff_set_status(&state, &ctx, loan.id, status("APPROVED")).await;

    assert!(matches!(result, Err(ApiError::Forbidden(_))));
}

#[tokio::test]
#[serial]
async fn test_status_view_requires_locked_payment_method_and_ages_into_review() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, Decimal::ZERO, "", AccountStatus::Active);
    let ctx = common::customer(account.id);

    LoanService::submit(&state, &ctx, loan_form("1000000", "12"))
        .await
        .unwrap();
    assert!(!LoanService::status_view(&state, &ctx).await.unwrap().visible);

    PaymentMethodService::save(
        &state,
        &ctx,
        SavePaymentMethodRequest {
            paypal_email: Some("payout@example.com".into()),
            ..SavePaymentMethodRequest::default()
        },
    )
    .await
    .unwrap();

    let view = LoanService::status_view(&state, &ctx).await.unwrap();
    assert!(view.visible);
    assert_eq!(view.status, Some(LoanStatus::Pending));

    let later = RequestContext::at(account.id, false, Utc::now() + Duration::hours(4));
    let view = LoanService::status_view(&state, &later).await.unwrap();
    assert_eq!(view.status, Some(LoanStatus::Review));
}

#[tokio::test]
#[serial]
async fn test_schedule_starts_fifteen_days_after_approval() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, Decimal::ZERO, "", AccountStatus::Active);
    let ctx = common::customer(account.id);
    let staff = common::staff(create_staff(conn).id);

    assert!(matches!(
        LoanService::schedule(&state, &ctx).await,
        Err(ApiError::NotFound(_))
    ));

    let loan = LoanService::submit(&state, &ctx, loan_form("1000000", "12"))
        .await
        .unwrap();
    let approved = LoanService::staff_set_status(&state, &staff, loan.id, status("APPROVED"))
        .await
        .unwrap();

    let schedule = LoanService::schedule(&state, &ctx).await.unwrap();
    assert_eq!(schedule.entries.len(), 12);
    assert_eq!(schedule.monthly_repayment, dec!(83633.33));

    let approved_at = approved.approved_at.unwrap().date_naive();
    let first = schedule.entries[0].due_date;
    assert_eq!(first, approved_at + Duration::days(15));
    assert_eq!(
        Some(schedule.entries[1].due_date),
        first.checked_add_months(Months::new(1))
    );
    assert_eq!(schedule.entries[11].installment, 12);
}
