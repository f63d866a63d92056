use crate::media::{ImageNormalizer, LocalImageStore};
use diesel::r2d2::{self, ConnectionManager};
use diesel::PgConnection;
use std::sync::Arc;

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

use eyre::Result;
pub use loanline_primitives::models::app_config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub media: Arc<dyn ImageNormalizer>,
}

impl AppState {
    pub fn new(db: DbPool, config: AppConfig) -> Result<Arc<Self>> {
        let media = LocalImageStore::new(&config.media)?;

        Ok(Self::with_media(db, config, Arc::new(media)))
    }

    pub fn with_media(db: DbPool, config: AppConfig, media: Arc<dyn ImageNormalizer>) -> Arc<Self> {
        Arc::new(Self { db, config, media })
    }
}
