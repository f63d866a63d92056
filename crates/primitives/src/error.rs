use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::r2d2;
use http::StatusCode;
use serde::Serialize;
use std::fmt;
use strum::{Display, EnumString, IntoStaticStr};
use utoipa::ToSchema;

/// Coded reasons a customer withdrawal is refused. The snake_case code is part
/// of the polling contract consumed by the wallet page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum WithdrawalRejection {
    AccountNotActive,
    OtpRequired,
    OtpWrong,
    Insufficient,
    AmountRequired,
    InvalidAmount,
    Exceed,
}

impl WithdrawalRejection {
    pub fn code(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug)]
pub enum ApiError {
    Database(diesel::result::Error),
    DatabaseConnection(String),
    Validation(validator::ValidationErrors),
    Invalid(String),
    Conflict(String),
    Withdrawal(WithdrawalRejection),
    ExternalService(String),
    NotFound(String),
    Auth(String),
    Forbidden(String),
    Internal(String),
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    pub ok: bool,
    #[schema(example = "otp_wrong")]
    pub error: String,
    pub message: String,
}

impl ApiError {
    /// Machine-readable code reported alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Database(_) | ApiError::DatabaseConnection(_) => "database_error",
            ApiError::Validation(_) | ApiError::Invalid(_) => "validation_error",
            ApiError::Conflict(_) => "conflict",
            ApiError::Withdrawal(reason) => reason.code(),
            ApiError::ExternalService(_) => "external_service_failure",
            ApiError::NotFound(_) => "not_found",
            ApiError::Auth(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Database(e) => write!(f, "Database error: {}", e),
            ApiError::DatabaseConnection(e) => write!(f, "Database connection error: {}", e),
            ApiError::Validation(e) => write!(f, "Validation error: {}", e),
            ApiError::Invalid(e) => write!(f, "Validation error: {}", e),
            ApiError::Conflict(e) => write!(f, "Conflict: {}", e),
            ApiError::Withdrawal(reason) => write!(f, "Withdrawal refused: {}", reason),
            ApiError::ExternalService(e) => write!(f, "External service failure: {}", e),
            ApiError::NotFound(e) => write!(f, "Not found: {}", e),
            ApiError::Auth(e) => write!(f, "Authentication error: {}", e),
            ApiError::Forbidden(e) => write!(f, "Forbidden: {}", e),
            ApiError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Database(e) => Some(e),
            ApiError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(err: r2d2::Error) -> Self {
        ApiError::DatabaseConnection(err.to_string())
    }
}

impl From<r2d2::PoolError> for ApiError {
    fn from(err: r2d2::PoolError) -> Self {
        ApiError::DatabaseConnection(err.to_string())
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        ApiError::Database(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err)
    }
}

impl From<WithdrawalRejection> for ApiError {
    fn from(reason: WithdrawalRejection) -> Self {
        ApiError::Withdrawal(reason)
    }
}

impl From<ApiError> for (StatusCode, ApiErrorResponse) {
    fn from(err: ApiError) -> Self {
        let code = err.code().to_string();
        let (status, message) = match err {
            ApiError::Database(e) => match e {
                diesel::result::Error::NotFound => {
                    (StatusCode::NOT_FOUND, "Record not found".to_string())
                }
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => (StatusCode::CONFLICT, format!("Database error: {}", e)),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", e),
                ),
            },
            ApiError::DatabaseConnection(e) => (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("Database connection error: {}", e),
            ),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                format!("Validation error: {}", errors),
            ),
            ApiError::Invalid(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Withdrawal(reason) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Withdrawal refused: {}", reason),
            ),
            ApiError::ExternalService(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Auth(msg) => (StatusCode::UNAUTHORIZED, format!("Auth error: {}", msg)),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {}", msg),
            ),
        };

        (
            status,
            ApiErrorResponse {
                ok: false,
                error: code,
                message,
            },
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body): (StatusCode, ApiErrorResponse) = self.into();
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn withdrawal_rejections_keep_wire_codes() {
        assert_eq!(WithdrawalRejection::AccountNotActive.code(), "account_not_active");
        assert_eq!(WithdrawalRejection::OtpWrong.code(), "otp_wrong");
        assert_eq!(WithdrawalRejection::Exceed.to_string(), "exceed");
    }

    #[test]
    fn conflict_maps_to_409() {
        let (status, body): (StatusCode, ApiErrorResponse) =
            ApiError::Conflict("already submitted".into()).into();
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(!body.ok);
        assert_eq!(body.error, "conflict");
    }

    #[test]
    fn withdrawal_rejection_reports_its_code() {
        let (status, body): (StatusCode, ApiErrorResponse) =
            ApiError::from(WithdrawalRejection::Insufficient).into();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body.error, "insufficient");
    }
}
