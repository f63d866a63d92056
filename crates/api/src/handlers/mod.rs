pub mod account_state;
pub mod account_status;
pub mod create_withdrawal;
pub mod current_loan;
pub mod health;
pub mod loan_config;
pub mod loan_schedule;
pub mod loan_status;
pub mod multipart;
pub mod payment_method;
pub mod save_payment_method;
pub mod staff_loan_status;
pub mod staff_loans;
pub mod staff_update_account;
pub mod staff_update_loan;
pub mod staff_update_payment_method;
pub mod staff_update_withdrawal;
pub mod staff_withdrawals;
pub mod submit_loan;
pub mod verify_otp;
pub mod withdrawal_history;
pub mod withdrawal_status;
