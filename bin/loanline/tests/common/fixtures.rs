use diesel::PgConnection;
use fake::faker::name::en::Name;
use fake::Fake;
use loanline_core::repositories::account_repository::AccountRepository;
use loanline_primitives::models::dtos::loan_dto::LoanApplicationForm;
use loanline_primitives::models::dtos::upload_dto::Upload;
use loanline_primitives::models::entities::account::{Account, NewAccount};
use loanline_primitives::models::entities::enum_types::AccountStatus;
use rust_decimal::Decimal;

/// Smallest byte string the image sniffer accepts as PNG.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

/// The PNG signature above as a signature-pad payload.
pub const SIGNATURE: &str = "data:image/png;base64,iVBORw0KGgo=";

pub fn random_phone() -> String {
    format!("09{}", (100_000_000u64..999_999_999).fake::<u64>())
}

pub fn create_account(
    conn: &mut PgConnection,
    balance: Decimal,
    otp: &str,
    status: AccountStatus,
) -> Account {
    let phone = random_phone();
    AccountRepository::create(
        conn,
        NewAccount {
            phone: &phone,
            balance,
            account_status: status,
            withdraw_otp: otp,
            credit_score: 600,
            is_staff: false,
        },
    )
    .expect("Failed to create account")
}

pub fn create_staff(conn: &mut PgConnection) -> Account {
    let phone = random_phone();
    AccountRepository::create(
        conn,
        NewAccount {
            phone: &phone,
            balance: Decimal::ZERO,
            account_status: AccountStatus::Active,
            withdraw_otp: "",
            credit_score: 0,
            is_staff: true,
        },
    )
    .expect("Failed to create staff account")
}

pub fn image(name: &str) -> Upload {
    Upload {
        file_name: name.to_string(),
        content_type: Some("image/png".to_string()),
        bytes: PNG_BYTES.to_vec(),
    }
}

pub fn loan_form(amount: &str, term: &str) -> LoanApplicationForm {
    LoanApplicationForm {
        full_name: Name().fake::<String>(),
        age: "32".into(),
        current_living: "Quezon City".into(),
        hometown: "Cebu".into(),
        income: "45000".into(),
        monthly_expenses: "20000".into(),
        guarantor_contact: random_phone(),
        guarantor_current_living: "Makati".into(),
        identity_name: "Passport".into(),
        identity_number: format!("P{}", (1_000_000u32..9_999_999).fake::<u32>()),
        loan_purposes: vec!["business".into()],
        amount: amount.into(),
        term: term.into(),
        signature_data: SIGNATURE.into(),
        income_proof: None,
        id_front: Some(image("front.png")),
        id_back: Some(image("back.png")),
        selfie_with_id: Some(image("selfie.png")),
    }
}
