use chrono::Utc;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use dotenvy::dotenv;
use loanline_primitives::models::entities::account::{Account, NewAccount};
use loanline_primitives::models::entities::enum_types::{AccountStatus, LoanStatus};
use loanline_primitives::models::entities::loan::NewLoanApplication;
use loanline_primitives::models::entities::loan_config::{LoanConfigRow, LoanTerms};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::env;
use uuid::Uuid;

fn establish_connection() -> PgConnection {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    PgConnection::establish(&database_url)
        .unwrap_or_else(|_| panic!("Error connecting to {}", database_url))
}

fn main() {
    dotenv().ok();
    println!("Seeding database...");

    let mut conn = establish_connection();

    clean_db(&mut conn);

    seed_account(&mut conn, "09170000000", Decimal::ZERO, "", true);
    let customer_id = seed_account(&mut conn, "09171234567", dec!(1000.00), "482913", false);

    seed_loan_config(&mut conn);
    seed_loan(&mut conn, customer_id);

    println!("Database seeded successfully");
}

fn clean_db(conn: &mut PgConnection) {
    println!("Cleaning database...");
    diesel::sql_query(
        "TRUNCATE balance_ledger, withdrawal_requests, payment_methods, loan_applications, loan_configs, accounts CASCADE",
    )
    .execute(conn)
    .expect("Error truncating tables");
}

fn seed_account(
    conn: &mut PgConnection,
    a_phone: &str,
    a_balance: Decimal,
    otp: &str,
    staff: bool,
) -> Uuid {
    use loanline_primitives::schema::accounts::dsl::*;

    let existing = accounts
        .filter(phone.eq(a_phone))
        .select(Account::as_select())
        .first(conn)
        .optional()
        .expect("Error looking up account");

    if let Some(account) = existing {
        println!("Account {} already exists", a_phone);
        return account.id;
    }

    let account = diesel::insert_into(accounts)
        .values(NewAccount {
            phone: a_phone,
            balance: a_balance,
            account_status: AccountStatus::Active,
            withdraw_otp: otp,
            credit_score: 600,
            is_staff: staff,
        })
        .returning(Account::as_returning())
        .get_result(conn)
        .expect("Error saving account");

    println!(
        "Seeded {} account {} ({})",
        if staff { "staff" } else { "customer" },
        a_phone,
        account.id
    );
    account.id
}

fn seed_loan_config(conn: &mut PgConnection) {
    use loanline_primitives::schema::loan_configs::dsl::*;

    diesel::insert_into(loan_configs)
        .values(LoanConfigRow::new(LoanTerms::default(), Utc::now()))
        .execute(conn)
        .expect("Error saving loan config");

    println!("Seeded loan config");
}

fn seed_loan(conn: &mut PgConnection, owner: Uuid) {
    use loanline_primitives::schema::loan_applications::dsl::*;

    let terms = LoanTerms::default();
    let principal = dec!(1000000);
    let term = 12;
    let repayment = loanline_primitives::lending::monthly_repayment(principal, terms.interest_rate_monthly, term)
        .expect("Error computing repayment");

    diesel::insert_into(loan_applications)
        .values(NewLoanApplication {
            account_id: owner,
            full_name: "Juan Dela Cruz".into(),
            age: 34,
            current_living: "Quezon City".into(),
            hometown: "Cebu".into(),
            income: "45000".into(),
            monthly_expenses: "20000".into(),
            guarantor_contact: "09179876543".into(),
            guarantor_current_living: "Makati".into(),
            identity_name: "Passport".into(),
            identity_number: "P1234567".into(),
            loan_purposes: serde_json::json!(["business"]),
            income_proof: None,
            id_front: None,
            id_back: None,
            selfie_with_id: None,
            signature_image: None,
            amount: principal,
            term_months: term,
            interest_rate_monthly: terms.interest_rate_monthly,
            monthly_repayment: repayment,
            status: LoanStatus::Pending,
        })
        .execute(conn)
        .expect("Error saving loan application");

    println!("Seeded pending loan of {} over {} months", principal, term);
}
