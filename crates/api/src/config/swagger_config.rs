use crate::handlers::multipart::{LoanApplicationMultipart, StaffLoanMultipart};
use crate::handlers::{
    account_state::__path_account_state, account_status::__path_account_status,
    create_withdrawal::__path_create_withdrawal, current_loan::__path_current_loan,
    health::__path_health_check, loan_config::__path_get_loan_config,
    loan_config::__path_update_loan_config, loan_schedule::__path_loan_schedule,
    loan_status::__path_loan_status, payment_method::__path_payment_method,
    save_payment_method::__path_save_payment_method,
    staff_loan_status::__path_staff_loan_status, staff_loans::__path_staff_loans,
    staff_update_account::__path_staff_update_account,
    staff_update_loan::__path_staff_update_loan,
    staff_update_payment_method::__path_staff_update_payment_method,
    staff_update_withdrawal::__path_staff_update_withdrawal,
    staff_withdrawals::__path_staff_withdrawals, submit_loan::__path_submit_loan,
    verify_otp::__path_verify_otp, withdrawal_history::__path_withdrawal_history,
    withdrawal_status::__path_withdrawal_status,
};
use loanline_primitives::error::ApiErrorResponse;
use loanline_primitives::models::dtos::{
    AccountResponse, AccountStatusResponse, CreateWithdrawalRequest, HealthStatus,
    LoanConfigResponse, LoanResponse, LoanStatusView, OtpCheckResponse, PaymentMethodResponse,
    RealtimeState, RepaymentScheduleResponse, SavePaymentMethodRequest, ScheduleEntry,
    StaffAccountUpdate, StaffLoanRow, StaffLoanStatusRequest, StaffPaymentMethodUpdate,
    StaffWithdrawalRow, StaffWithdrawalUpdate, UpdateLoanConfigRequest, VerifyOtpRequest,
    WithdrawalHistoryResponse, WithdrawalOutcome, WithdrawalResponse, WithdrawalSnapshot,
    WithdrawalStatusResponse,
};
use loanline_primitives::models::entities::{
    AccountStatus, LoanStatus, LoanTerms, PayoutChannel, WithdrawalStatus,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        submit_loan, current_loan, loan_status, loan_schedule,
        create_withdrawal, verify_otp, withdrawal_status, withdrawal_history,
        account_state, account_status,
        save_payment_method, payment_method,
        staff_loans, staff_update_loan, staff_loan_status,
        staff_withdrawals, staff_update_withdrawal,
        staff_update_account, staff_update_payment_method,
        get_loan_config, update_loan_config
    ),
    components(schemas(
        ApiErrorResponse, HealthStatus,
        AccountStatus, LoanStatus, WithdrawalStatus, PayoutChannel, LoanTerms,
        LoanApplicationMultipart, StaffLoanMultipart, StaffLoanStatusRequest,
        LoanResponse, LoanStatusView, ScheduleEntry, RepaymentScheduleResponse, StaffLoanRow,
        CreateWithdrawalRequest, VerifyOtpRequest, OtpCheckResponse, WithdrawalResponse,
        WithdrawalOutcome, WithdrawalStatusResponse, WithdrawalHistoryResponse,
        StaffWithdrawalUpdate, StaffWithdrawalRow,
        WithdrawalSnapshot, RealtimeState, AccountStatusResponse, StaffAccountUpdate, AccountResponse,
        SavePaymentMethodRequest, StaffPaymentMethodUpdate, PaymentMethodResponse,
        LoanConfigResponse, UpdateLoanConfigRequest
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Loans", description = "Customer loan applications and repayment schedule"),
        (name = "Withdrawals", description = "Customer withdrawals gated by staff-issued OTP"),
        (name = "Account", description = "Customer account state"),
        (name = "Payment Method", description = "Customer payout channel"),
        (name = "Staff", description = "Staff back-office mutations and listings")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "bearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
