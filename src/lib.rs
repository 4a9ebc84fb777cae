pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod proxy;
pub mod routes;
pub mod services;
pub mod state;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{DatabaseManager, MemoryRepository, PgRepository, Repository};

/// Picks the store for `config`: Postgres when a URL is set, otherwise the
/// seeded in-memory store.
pub async fn connect_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn Repository>> {
    match &config.database.url {
        Some(_) => {
            let pool = DatabaseManager::connect(&config.database).await?;
            tracing::info!("Using PostgreSQL store");
            Ok(Arc::new(PgRepository::new(pool)))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store");
            Ok(Arc::new(MemoryRepository::seeded()))
        }
    }
}
