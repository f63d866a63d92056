use crate::models::app_state::jwt_details::JWTInfo;
use crate::models::app_state::lending_details::LendingPolicy;
use crate::models::app_state::media_details::MediaInfo;
use eyre::Report;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub jwt_details: JWTInfo,

    pub app_url: String,

    pub media: MediaInfo,

    pub lending: LendingPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Report> {
        Ok(Self {
            jwt_details: JWTInfo::new()?,

            app_url: env::var("APP_URL").unwrap_or_else(|_| "http://localhost:8080".into()),

            media: MediaInfo::new()?,

            lending: LendingPolicy::new()?,
        })
    }
}
