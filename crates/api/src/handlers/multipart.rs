use axum::extract::Multipart;
use loanline_primitives::error::ApiError;
use loanline_primitives::models::dtos::loan_dto::{LoanApplicationForm, StaffLoanUpdate};
use loanline_primitives::models::dtos::upload_dto::Upload;
use std::collections::HashMap;
use tracing::warn;
use utoipa::ToSchema;

/// Text fields and file parts pulled out of a multipart body.
#[derive(Debug, Default)]
pub struct FormParts {
    text: HashMap<String, Vec<String>>,
    files: HashMap<String, Upload>,
}

impl FormParts {
    pub async fn collect(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut parts = FormParts::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            warn!("multipart: unreadable field: {}", e);
            ApiError::Invalid(format!("Malformed form data: {}", e))
        })? {
            let Some(name) = field.name().map(|n| n.trim_end_matches("[]").to_string()) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(str::to_string) {
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Invalid(format!("Failed to read {}: {}", name, e)))?;
                if bytes.is_empty() {
                    continue;
                }
                parts.files.insert(
                    name,
                    Upload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                );
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Invalid(format!("Failed to read {}: {}", name, e)))?;
                parts.text.entry(name).or_default().push(value);
            }
        }

        Ok(parts)
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.text.get(name).and_then(|v| v.first()).cloned()
    }

    fn text_or_blank(&self, name: &str) -> String {
        self.text(name).unwrap_or_default()
    }

    /// Every non-blank value submitted under `name`.
    pub fn all(&self, name: &str) -> Vec<String> {
        self.text
            .get(name)
            .map(|values| {
                values
                    .iter()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn take_file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }

    pub fn into_application(mut self) -> LoanApplicationForm {
        LoanApplicationForm {
            full_name: self.text_or_blank("full_name"),
            age: self.text_or_blank("age"),
            current_living: self.text_or_blank("current_living"),
            hometown: self.text_or_blank("hometown"),
            income: self.text_or_blank("income"),
            monthly_expenses: self.text_or_blank("monthly_expenses"),
            guarantor_contact: self.text_or_blank("guarantor_contact"),
            guarantor_current_living: self.text_or_blank("guarantor_current_living"),
            identity_name: self.text_or_blank("identity_name"),
            identity_number: self.text_or_blank("identity_number"),
            loan_purposes: self.all("loan_purposes"),
            amount: self.text_or_blank("amount"),
            term: self.text_or_blank("term"),
            signature_data: self.text_or_blank("signature_data"),
            income_proof: self.take_file("income_proof"),
            id_front: self.take_file("id_front"),
            id_back: self.take_file("id_back"),
            selfie_with_id: self.take_file("selfie_with_id"),
        }
    }

    pub fn into_staff_update(mut self) -> StaffLoanUpdate {
        StaffLoanUpdate {
            full_name: self.text("full_name"),
            current_living: self.text("current_living"),
            hometown: self.text("hometown"),
            income: self.text("income"),
            monthly_expenses: self.text("monthly_expenses"),
            guarantor_contact: self.text("guarantor_contact"),
            guarantor_current_living: self.text("guarantor_current_living"),
            identity_name: self.text("identity_name"),
            identity_number: self.text("identity_number"),
            phone: self.text("phone"),
            age: self.text("age"),
            amount: self.text("amount"),
            term: self.text("term"),
            interest_rate_monthly: self.text("interest_rate_monthly"),
            status: self.text("status"),
            signature_data: self.text("signature_data"),
            income_proof: self.take_file("income_proof"),
            id_front: self.take_file("id_front"),
            id_back: self.take_file("id_back"),
            selfie_with_id: self.take_file("selfie_with_id"),
        }
    }
}

/// Shape of the loan application form as documented in OpenAPI.
#[derive(ToSchema)]
pub struct LoanApplicationMultipart {
    pub full_name: String,
    pub age: String,
    pub current_living: String,
    pub hometown: String,
    pub income: String,
    pub monthly_expenses: String,
    pub guarantor_contact: String,
    pub guarantor_current_living: String,
    pub identity_name: String,
    pub identity_number: String,
    /// Repeat the field once per purpose.
    pub loan_purposes: Vec<String>,
    #[schema(example = "200000")]
    pub amount: String,
    #[schema(example = "12")]
    pub term: String,
    /// `data:image/png;base64,...`
    pub signature_data: String,
    #[schema(value_type = Option<String>, format = Binary)]
    pub income_proof: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub id_front: String,
    #[schema(value_type = String, format = Binary)]
    pub id_back: String,
    #[schema(value_type = String, format = Binary)]
    pub selfie_with_id: String,
}

/// Staff edit form. Every field is optional and blank means unchanged.
#[derive(ToSchema)]
pub struct StaffLoanMultipart {
    pub full_name: Option<String>,
    pub current_living: Option<String>,
    pub hometown: Option<String>,
    pub income: Option<String>,
    pub monthly_expenses: Option<String>,
    pub guarantor_contact: Option<String>,
    pub guarantor_current_living: Option<String>,
    pub identity_name: Option<String>,
    pub identity_number: Option<String>,
    pub phone: Option<String>,
    pub age: Option<String>,
    pub amount: Option<String>,
    pub term: Option<String>,
    pub interest_rate_monthly: Option<String>,
    #[schema(example = "APPROVED")]
    pub status: Option<String>,
    pub signature_data: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub income_proof: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub id_front: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub id_back: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub selfie_with_id: Option<String>,
}
