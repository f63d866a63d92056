use eyre::{eyre, Report};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct MediaInfo {
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl MediaInfo {
    pub fn new() -> Result<Self, Report> {
        Ok(Self {
            upload_dir: env::var("UPLOAD_DIR")
                .unwrap_or_else(|_| "./media".into())
                .into(),
            max_upload_bytes: match env::var("MAX_UPLOAD_BYTES") {
                Ok(raw) => raw
                    .parse()
                    .map_err(|e| eyre!("Invalid MAX_UPLOAD_BYTES: {}", e))?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }
}
