//! Durable key/value store the catalog persists its snapshot into.
//!
//! The store holds opaque text blobs under string keys. The catalog owns a
//! single key; other collaborators (the login flow's session token) may keep
//! their own keys in the same store.

mod memory;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{StorageBackend, StorageConfig};

/// Default key under which the catalog snapshot is stored.
pub const DEFAULT_SNAPSHOT_KEY: &str = "products";

/// Key owned by the authentication collaborator. The catalog never touches it.
pub const SESSION_TOKEN_KEY: &str = "userToken";

/// Errors for key/value store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Trait for durable key/value storage backends.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the blob stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous blob.
    ///
    /// Returns only once the write is committed.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete whatever is stored under `key`. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Name of this backend, for logs.
    fn backend_name(&self) -> &'static str;
}

/// Factory function to create a key/value store from config
pub fn create_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>, StoreError> {
    match config.backend {
        StorageBackend::Sqlite => Ok(Arc::new(SqliteKeyValueStore::new(&config.path)?)),
        StorageBackend::Memory => Ok(Arc::new(MemoryKeyValueStore::new())),
    }
}
