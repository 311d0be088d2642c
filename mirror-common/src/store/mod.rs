//! Key-value storage
//!
//! Legacy records live as whole JSON arrays under a single key each. The
//! [`KeyValueStore`] trait is the seam between record collections and the
//! persistence backend.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::Result;

mod collection;
mod memory;
#[cfg(feature = "sqlx")]
mod sqlite;

pub use collection::{Record, RecordCollection};
pub use memory::MemoryStore;
#[cfg(feature = "sqlx")]
pub use sqlite::SqliteStore;

/// Shared handle to a store backend
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Minimal key-value store holding JSON values
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Backend identifier for logs (e.g., "sqlite", "memory")
    fn backend_name(&self) -> &'static str;

    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the value stored under `key`
    async fn set(&self, key: &str, value: &Value) -> Result<()>;

    /// Remove `key`, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool>;

    /// All keys currently present, sorted
    async fn keys(&self) -> Result<Vec<String>>;
}

/// Open the configured backend
#[cfg(feature = "sqlx")]
pub async fn open_store(
    backend: crate::config::StorageBackend,
    db_path: &std::path::Path,
) -> Result<SharedStore> {
    use crate::config::StorageBackend;

    match backend {
        StorageBackend::Sqlite => {
            let pool = crate::db::init_database(db_path).await?;
            Ok(Arc::new(SqliteStore::new(pool)))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
