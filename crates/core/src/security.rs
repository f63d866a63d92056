use crate::app_state::AppState;
use crate::repositories::account_repository::AccountRepository;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{Duration, Utc};
use http::HeaderMap;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use loanline_primitives::error::ApiError;
use loanline_primitives::models::context::RequestContext;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // account id
    #[serde(default)]
    pub staff: bool,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
    pub jti: String,
}

impl Claims {
    pub fn account_id(&self) -> Result<Uuid, ApiError> {
        Uuid::parse_str(&self.sub).map_err(|e| {
            error!("Invalid account ID in claims: {}", e);
            ApiError::Auth("Invalid token subject".to_string())
        })
    }

    /// Request-scoped identity and clock handed to the services.
    pub fn context(&self) -> Result<RequestContext, ApiError> {
        Ok(RequestContext::new(self.account_id()?, self.staff))
    }
}

pub struct SecurityConfig;

impl SecurityConfig {
    pub fn create_token(state: &AppState, account_id: Uuid, staff: bool) -> Result<String, ApiError> {
        let now = Utc::now();
        let jwt = &state.config.jwt_details;

        let claims = Claims {
            sub: account_id.to_string(),
            staff,
            iat: now.timestamp(),
            exp: (now + Duration::hours(jwt.jwt_expiration_hours)).timestamp(),
            iss: jwt.jwt_issuer.clone(),
            aud: jwt.jwt_audience.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        encode(
            &header,
            &claims,
            &EncodingKey::from_secret(jwt.jwt_secret.expose_secret().as_bytes()),
        )
        .map_err(|e| {
            error!("JWT encoding error: {}", e);
            ApiError::Internal("Token creation failed".into())
        })
    }

    fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
        let auth_header = headers
            .get("Authorization")
            .ok_or_else(|| ApiError::Auth("Missing authorization header".into()))?
            .to_str()
            .map_err(|_| ApiError::Auth("Invalid authorization header".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Auth("Invalid authorization header".into()))?
            .trim();

        if token.is_empty() {
            return Err(ApiError::Auth("Invalid authorization header".into()));
        }

        Ok(token.to_string())
    }

    pub fn verify_token(state: &AppState, token: &str) -> Result<Claims, ApiError> {
        let jwt = &state.config.jwt_details;
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[jwt.jwt_issuer.as_str()]);
        validation.set_audience(&[jwt.jwt_audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(jwt.jwt_secret.expose_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| ApiError::Auth("Invalid or expired token".into()))
    }

    /// Verifies the bearer token and that the account is still enabled. The
    /// staff flag is only honored when the account row agrees.
    pub async fn auth_middleware(
        State(state): State<Arc<AppState>>,
        mut req: Request<axum::body::Body>,
        next: Next,
    ) -> Result<Response, Response> {
        let token = Self::extract_bearer_token(req.headers()).map_err(IntoResponse::into_response)?;
        let mut claims = Self::verify_token(&state, &token).map_err(IntoResponse::into_response)?;
        let account_id = claims.account_id().map_err(IntoResponse::into_response)?;

        let mut conn = state
            .db
            .get()
            .map_err(|e| ApiError::from(e).into_response())?;

        let account = AccountRepository::find_by_id(&mut conn, account_id)
            .map_err(IntoResponse::into_response)?
            .filter(|a| a.is_active)
            .ok_or_else(|| {
                warn!(%account_id, "auth: unknown or disabled account");
                ApiError::Auth("Account is disabled".into()).into_response()
            })?;

        claims.staff = claims.staff && account.is_staff;
        req.extensions_mut().insert(claims);
        Ok(next.run(req).await)
    }

    pub async fn require_staff(
        req: Request<axum::body::Body>,
        next: Next,
    ) -> Result<Response, Response> {
        let is_staff = req
            .extensions()
            .get::<Claims>()
            .map(|c| c.staff)
            .unwrap_or(false);

        if !is_staff {
            return Err(ApiError::Forbidden("Staff access required".into()).into_response());
        }
        Ok(next.run(req).await)
    }
}
