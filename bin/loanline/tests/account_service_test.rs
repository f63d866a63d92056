use loanline_core::repositories::ledger_repository::LedgerRepository;
use loanline_core::services::account_service::AccountService;
use loanline_core::services::loan_config_service::LoanConfigService;
use loanline_core::services::payment_method_service::PaymentMethodService;
use loanline_core::services::withdrawal_service::WithdrawalService;
use loanline_primitives::error::ApiError;
use loanline_primitives::models::dtos::account_dto::StaffAccountUpdate;
use loanline_primitives::models::dtos::config_dto::UpdateLoanConfigRequest;
use loanline_primitives::models::dtos::payment_method_dto::{
    SavePaymentMethodRequest, StaffPaymentMethodUpdate,
};
use loanline_primitives::models::dtos::withdrawal_dto::CreateWithdrawalRequest;
use loanline_primitives::models::entities::enum_types::{AccountStatus, LedgerReason};
use loanline_primitives::models::entities::payment_method::PayoutChannel;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serial_test::serial;

mod common;

use common::fixtures::{create_account, create_staff};

#[tokio::test]
#[serial]
async fn test_realtime_state_reports_balance_otp_and_latest_withdrawal() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, dec!(1500), "7777", AccountStatus::Active);
    let ctx = common::customer(account.id);

    let before = AccountService::realtime_state(&state, &ctx).await.unwrap();
    assert!(before.ok);
    assert_eq!(before.account_status, "active");
    assert!(before.otp_required);
    assert!(before.withdrawal.is_none());

    WithdrawalService::create(
        &state,
        &ctx,
        CreateWithdrawalRequest {
            amount: Some("500".into()),
            otp: Some("7777".into()),
        },
    )
    .await
    .unwrap();

    let after = AccountService::realtime_state(&state, &ctx).await.unwrap();
    assert_eq!(after.balance, dec!(1000));
    assert!(after.withdrawal.is_some());
}

#[tokio::test]
#[serial]
async fn test_staff_balance_override_is_journaled() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, dec!(100), "", AccountStatus::Active);
    let staff = common::staff(create_staff(conn).id);

    let updated = AccountService::staff_update(
        &state,
        &staff,
        account.id,
        StaffAccountUpdate {
            account_status: Some("new_otp_code".into()),
            withdraw_otp: Some(" 123456 ".into()),
            balance: Some("250.50".into()),
            ..StaffAccountUpdate::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.balance, dec!(250.50));
    assert_eq!(updated.account_status, AccountStatus::NewOtpCode);
    assert!(updated.otp_set);

    let ledger = LedgerRepository::for_account(conn, account.id).unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].reason, LedgerReason::StaffAdjustment);
    assert_eq!(ledger[0].amount, dec!(150.50));

    let status = AccountService::status(&state, &common::customer(account.id))
        .await
        .unwrap();
    assert!(!status.message.is_empty());
}

#[tokio::test]
#[serial]
async fn test_staff_account_update_rejects_bad_input_without_changes() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, dec!(100), "", AccountStatus::Active);
    let staff = common::staff(create_staff(conn).id);

    let result = AccountService::staff_update(
        &state,
        &staff,
        account.id,
        StaffAccountUpdate {
            account_status: Some("FROZEN".into()),
            balance: Some("-1".into()),
            ..StaffAccountUpdate::default()
        },
    )
    .await;
    assert!(matches!(result, Err(ApiError::Invalid(_))));

    let sub_cent = AccountService::staff_update(
        &state,
        &staff,
        account.id,
        StaffAccountUpdate {
            balance: Some("100.005".into()),
            ..StaffAccountUpdate::default()
        },
    )
    .await;
    assert!(matches!(sub_cent, Err(ApiError::Invalid(_))));

    let current = AccountService::realtime_state(&state, &common::customer(account.id))
        .await
        .unwrap();
    assert_eq!(current.account_status, "active");
    assert_eq!(current.balance, dec!(100));
}

#[tokio::test]
#[serial]
async fn test_payment_method_requires_exactly_one_channel_and_locks() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, Decimal::ZERO, "", AccountStatus::Active);
    let ctx = common::customer(account.id);

    let none = PaymentMethodService::save(&state, &ctx, SavePaymentMethodRequest::default()).await;
    assert!(matches!(none, Err(ApiError::Invalid(_))));

    let two = SavePaymentMethodRequest {
        bank_name: Some("BDO".into()),
        bank_account: Some("001234567890".into()),
        paypal_email: Some("me@example.com".into()),
        ..SavePaymentMethodRequest::default()
    };
    assert!(matches!(
        PaymentMethodService::save(&state, &ctx, two).await,
        Err(ApiError::Invalid(_))
    ));
    assert!(matches!(
        PaymentMethodService::get(&state, &ctx).await,
        Err(ApiError::NotFound(_))
    ));

    let wallet = SavePaymentMethodRequest {
        wallet_name: Some("GCash".into()),
        wallet_phone: Some("09171234567".into()),
        ..SavePaymentMethodRequest::default()
    };
    let saved = PaymentMethodService::save(&state, &ctx, wallet).await.unwrap();
    assert_eq!(saved.channel, Some(PayoutChannel::Wallet));
    assert!(saved.locked);

    let change = SavePaymentMethodRequest {
        paypal_email: Some("me@example.com".into()),
        ..SavePaymentMethodRequest::default()
    };
    assert!(matches!(
        PaymentMethodService::save(&state, &ctx, change).await,
        Err(ApiError::Conflict(_))
    ));
}

#[tokio::test]
#[serial]
async fn test_staff_payment_method_override() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let account = create_account(conn, Decimal::ZERO, "", AccountStatus::Active);
    let staff = common::staff(create_staff(conn).id);

    let bad = StaffPaymentMethodUpdate {
        paypal_email: Some("not-an-email".into()),
        ..StaffPaymentMethodUpdate::default()
    };
    assert!(matches!(
        PaymentMethodService::staff_update(&state, &staff, account.id, bad).await,
        Err(ApiError::Invalid(_))
    ));

    let created = PaymentMethodService::staff_update(
        &state,
        &staff,
        account.id,
        StaffPaymentMethodUpdate {
            bank_name: Some("BPI".into()),
            bank_account: Some("1234".into()),
            ..StaffPaymentMethodUpdate::default()
        },
    )
    .await
    .unwrap();
    assert!(!created.locked);
    assert_eq!(created.channel, Some(PayoutChannel::Bank));

    let unlocked = PaymentMethodService::staff_update(
        &state,
        &staff,
        account.id,
        StaffPaymentMethodUpdate {
            locked: Some(true),
            ..StaffPaymentMethodUpdate::default()
        },
    )
    .await
    .unwrap();
    assert!(unlocked.locked);
    assert_eq!(unlocked.bank_name, "BPI");
}

#[tokio::test]
#[serial]
async fn test_loan_config_defaults_and_validation() {
    let state = common::test_state();
    let conn = &mut state.db.get().unwrap();
    let staff = common::staff(create_staff(conn).id);

    let defaults = LoanConfigService::current(&state, &staff).await.unwrap();
    assert!(defaults.updated_at.is_none());
    assert_eq!(defaults.terms.interest_rate_monthly, dec!(0.0003));
    assert_eq!(defaults.terms.min_amount, dec!(200000));
    assert_eq!(defaults.terms.max_amount, dec!(60000000));

    let inverted = UpdateLoanConfigRequest {
        interest_rate_monthly: "0.0005".into(),
        min_amount: "500000".into(),
        max_amount: "100000".into(),
    };
    assert!(matches!(
        LoanConfigService::update(&state, &staff, inverted).await,
        Err(ApiError::Invalid(_))
    ));

    let saved = LoanConfigService::update(
        &state,
        &staff,
        UpdateLoanConfigRequest {
            interest_rate_monthly: "0.0005".into(),
            min_amount: "100000".into(),
            max_amount: "500000".into(),
        },
    )
    .await
    .unwrap();
    assert!(saved.updated_at.is_some());
    assert_eq!(saved.terms.max_amount, dec!(500000));

    let huge_rate = UpdateLoanConfigRequest {
        interest_rate_monthly: "100000000000000000000000".into(),
        min_amount: "100000".into(),
        max_amount: "500000".into(),
    };
    assert!(matches!(
        LoanConfigService::update(&state, &staff, huge_rate).await,
        Err(ApiError::Invalid(_))
    ));
    let kept = LoanConfigService::current(&state, &staff).await.unwrap();
    assert_eq!(kept.terms.interest_rate_monthly, dec!(0.0005));

    let customer = common::customer(create_account(conn, Decimal::ZERO, "", AccountStatus::Active).id);
    assert!(matches!(
        LoanConfigService::current(&state, &customer).await,
        Err(ApiError::Forbidden(_))
    ));
}
