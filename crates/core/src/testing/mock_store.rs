//! Mock key/value store for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

use crate::store::{KeyValueStore, StoreError};

/// Mock implementation of the KeyValueStore trait.
///
/// Provides controllable behavior for testing:
/// - Inspect and seed stored blobs directly
/// - Simulate read and write failures
/// - Slow down writes to widen race windows
/// - Count committed writes
///
/// # Example
///
/// ```rust,ignore
/// use shelfkeeper_core::testing::MockKeyValueStore;
///
/// let store = Arc::new(MockKeyValueStore::new());
/// store.fail_writes(true);
///
/// let result = repo.add_product(candidate).await;
/// assert!(matches!(result, Err(CatalogError::Persistence(_))));
/// ```
#[derive(Debug, Default)]
pub struct MockKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    write_delay_ms: AtomicU64,
    writes: AtomicUsize,
}

impl MockKeyValueStore {
    /// Create a new, empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `get` calls fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent `set` and `remove` calls fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delay every `set` by the given duration before committing.
    pub fn set_write_delay(&self, delay: Duration) {
        self.write_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Seed a blob without going through the trait (not counted as a write).
    pub async fn insert(&self, key: &str, value: &str) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }

    /// Read a blob without going through the trait.
    pub async fn stored(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MockKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Database("mock read failure".to_string()));
        }
        Ok(self.stored(key).await)
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let delay = self.write_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Database("mock write failure".to_string()));
        }
        self.insert(key, value).await;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Database("mock write failure".to_string()));
        }
        self.entries.write().await.remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }
}
