use crate::error::ApiError;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Who is calling and what time it is. Built once per request by the handler
/// and passed into every service call.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    pub account_id: Uuid,
    pub is_staff: bool,
    pub now: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(account_id: Uuid, is_staff: bool) -> Self {
        Self::at(account_id, is_staff, Utc::now())
    }

    pub fn at(account_id: Uuid, is_staff: bool, now: DateTime<Utc>) -> Self {
        Self {
            account_id,
            is_staff,
            now,
        }
    }

    pub fn ensure_staff(&self) -> Result<(), ApiError> {
        if self.is_staff {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Staff access required".into()))
        }
    }
}
