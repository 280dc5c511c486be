//! Application state shared by every handler

use std::sync::Arc;

use crate::BoxError;
use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::db::Store;
use crate::db::memory::MemoryStore;
use crate::db::postgres::PostgresStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenIssuer>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Connect the configured store backend
    pub async fn new(config: Config) -> Result<Self, BoxError> {
        let store: Arc<dyn Store> = match &config.database_url {
            Some(url) => Arc::new(PostgresStore::connect(url).await?),
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory store (data is not persisted)");
                MemoryStore::new_shared()
            }
        };
        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Self {
        Self {
            store,
            tokens: Arc::new(TokenIssuer::new(&config)),
            config: Arc::new(config),
        }
    }
}
