// Storage layer for Rollcall server
// Decision: Support both PostgreSQL (production) and in-memory (dev mode)
//
// Both backends implement rollcall_core::DocumentStore:
// - InMemoryDocumentStore: HashMap behind a RwLock, used when DATABASE_URL is unset
// - PostgresDocumentStore: JSONB documents in PostgreSQL

pub mod memory;
pub mod postgres;

pub use memory::InMemoryDocumentStore;
pub use postgres::PostgresDocumentStore;

use crate::config::ServerConfig;
use anyhow::{Context, Result};
use rollcall_core::DocumentStore;
use std::sync::Arc;

/// Open the document store selected by configuration.
///
/// Called once at startup; the returned handle is shared by every request.
pub async fn open_store(config: &ServerConfig) -> Result<Arc<dyn DocumentStore>> {
    match &config.database_url {
        Some(url) => {
            let store = PostgresDocumentStore::connect(url, config.database_max_connections)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to PostgreSQL document store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
    }
}
