//! The catalog repository: canonical product list plus its durable snapshot.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, warn};

use super::search::filter_products;
use super::{CatalogError, CatalogEvent, CatalogEventEnvelope, LoadReport, Product, ProductCandidate};
use crate::config::{CatalogConfig, Config, PersistFailurePolicy};
use crate::metrics::{CATALOG_MUTATIONS, PERSIST_DURATION, SNAPSHOT_LOADS};
use crate::store::{KeyValueStore, StoreError};

/// Owner of the product catalog.
///
/// The repository starts uninitialized; [`load`](Self::load) reads the
/// persisted snapshot and makes it ready. Every other operation fails with
/// [`CatalogError::NotReady`] until then.
///
/// Mutations are serialized by an internal lock held across the whole
/// check-modify-persist sequence, so concurrent callers cannot both pass the
/// duplicate check. Readers only take the state lock and see either the
/// previous or the new catalog, never a partial one.
pub struct CatalogRepository {
    store: Arc<dyn KeyValueStore>,
    snapshot_key: String,
    policy: PersistFailurePolicy,
    /// `None` until the first load completes.
    products: RwLock<Option<Vec<Product>>>,
    write_lock: Mutex<()>,
    events: broadcast::Sender<CatalogEventEnvelope>,
}

/// What a commit did: whether readers now see the change, and whether it is durable.
struct Commit {
    visible: bool,
    durable: Result<(), StoreError>,
}

impl CatalogRepository {
    /// Create a repository storing its snapshot under `snapshot_key`.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        snapshot_key: impl Into<String>,
        config: &CatalogConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        Self {
            store,
            snapshot_key: snapshot_key.into(),
            policy: config.on_persist_failure,
            products: RwLock::new(None),
            write_lock: Mutex::new(()),
            events,
        }
    }

    /// Create a repository from the application config.
    pub fn from_config(store: Arc<dyn KeyValueStore>, config: &Config) -> Self {
        Self::new(store, config.storage.snapshot_key.clone(), &config.catalog)
    }

    /// Create a repository with the default key and policy.
    pub fn with_defaults(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(
            store,
            crate::store::DEFAULT_SNAPSHOT_KEY,
            &CatalogConfig::default(),
        )
    }

    pub fn snapshot_key(&self) -> &str {
        &self.snapshot_key
    }

    pub fn policy(&self) -> PersistFailurePolicy {
        self.policy
    }

    /// Whether [`load`](Self::load) has completed.
    pub async fn is_ready(&self) -> bool {
        self.products.read().await.is_some()
    }

    /// Subscribe to catalog change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEventEnvelope> {
        self.events.subscribe()
    }

    /// Read the persisted snapshot and replace the in-memory catalog with it.
    ///
    /// Never fails: a missing snapshot gives an empty catalog, and an
    /// unreadable or corrupt one also gives an empty catalog, reported as
    /// [`LoadReport::Recovered`]. A corrupt blob stays in the store until the
    /// next successful mutation overwrites it.
    pub async fn load(&self) -> LoadReport {
        let _guard = self.write_lock.lock().await;

        let (products, report) = match self.store.get(&self.snapshot_key).await {
            Ok(None) => (Vec::new(), LoadReport::Fresh),
            Ok(Some(blob)) => decode_snapshot(&blob),
            Err(e) => {
                warn!(
                    "Failed to read catalog snapshot from {} store: {}",
                    self.store.backend_name(),
                    e
                );
                (
                    Vec::new(),
                    LoadReport::Recovered {
                        reason: format!("store read failed: {}", e),
                    },
                )
            }
        };

        SNAPSHOT_LOADS.with_label_values(&[report.label()]).inc();

        let count = products.len();
        *self.products.write().await = Some(products);
        info!(
            "Catalog loaded from key '{}' ({}): {} products",
            self.snapshot_key,
            report.label(),
            count
        );

        self.notify(CatalogEvent::Loaded { count });
        report
    }

    /// Serialize the current catalog and commit it to the store.
    ///
    /// Takes the mutation lock, so the snapshot written is always one the
    /// repository actually holds. Useful for retrying after a
    /// [`CatalogError::Persistence`] left memory ahead of the store.
    pub async fn persist(&self) -> Result<(), CatalogError> {
        let _guard = self.write_lock.lock().await;
        let blob = encode_snapshot(&self.products().await?)?;
        self.write_snapshot(&blob).await?;
        Ok(())
    }

    /// A copy of the whole catalog in insertion order.
    pub async fn products(&self) -> Result<Vec<Product>, CatalogError> {
        self.products
            .read()
            .await
            .clone()
            .ok_or(CatalogError::NotReady)
    }

    /// Number of products in the catalog.
    pub async fn len(&self) -> Result<usize, CatalogError> {
        self.products
            .read()
            .await
            .as_ref()
            .map(Vec::len)
            .ok_or(CatalogError::NotReady)
    }

    pub async fn is_empty(&self) -> Result<bool, CatalogError> {
        Ok(self.len().await? == 0)
    }

    /// Products whose name contains `query`, case-insensitively, in catalog order.
    pub async fn filtered_view(&self, query: &str) -> Result<Vec<Product>, CatalogError> {
        let guard = self.products.read().await;
        let products = guard.as_ref().ok_or(CatalogError::NotReady)?;
        Ok(filter_products(products, query))
    }

    /// Validate and append a product, then persist the catalog.
    ///
    /// Fails with [`CatalogError::Validation`] when a field is empty and
    /// [`CatalogError::Duplicate`] when the name (compared exactly) is taken;
    /// in both cases nothing changes. A failed commit yields
    /// [`CatalogError::Persistence`]; whether the product is still visible
    /// afterwards depends on the configured [`PersistFailurePolicy`].
    pub async fn add_product(&self, candidate: ProductCandidate) -> Result<Product, CatalogError> {
        let result = self.try_add(candidate).await;
        let label = match &result {
            Ok(_) => "ok",
            Err(e) => error_label(e),
        };
        CATALOG_MUTATIONS.with_label_values(&["add", label]).inc();
        result
    }

    /// Remove the product named exactly `name`.
    ///
    /// Returns `Ok(false)` without touching the store when no product matches.
    pub async fn remove_product(&self, name: &str) -> Result<bool, CatalogError> {
        let result = self.try_remove(name).await;
        let label = match &result {
            Ok(true) => "ok",
            Ok(false) => "noop",
            Err(e) => error_label(e),
        };
        CATALOG_MUTATIONS.with_label_values(&["remove", label]).inc();
        result
    }

    async fn try_add(&self, candidate: ProductCandidate) -> Result<Product, CatalogError> {
        let _guard = self.write_lock.lock().await;

        let mut updated = self.products().await?;
        let product = candidate.validate()?;

        if updated.iter().any(|p| p.name == product.name) {
            debug!("Rejected duplicate product '{}'", product.name);
            return Err(CatalogError::Duplicate(product.name));
        }

        updated.push(product.clone());
        let commit = self.commit(updated).await?;

        if commit.visible {
            self.notify(CatalogEvent::ProductAdded {
                name: product.name.clone(),
                durable: commit.durable.is_ok(),
            });
        }

        match commit.durable {
            Ok(()) => {
                info!("Added product '{}'", product.name);
                Ok(product)
            }
            Err(e) => {
                warn!("Product '{}' was not saved: {}", product.name, e);
                Err(CatalogError::Persistence(e))
            }
        }
    }

    async fn try_remove(&self, name: &str) -> Result<bool, CatalogError> {
        let _guard = self.write_lock.lock().await;

        let mut updated = self.products().await?;
        let Some(position) = updated.iter().position(|p| p.name == name) else {
            debug!("Remove of unknown product '{}' ignored", name);
            return Ok(false);
        };

        updated.remove(position);
        let commit = self.commit(updated).await?;

        if commit.visible {
            self.notify(CatalogEvent::ProductRemoved {
                name: name.to_string(),
                durable: commit.durable.is_ok(),
            });
        }

        match commit.durable {
            Ok(()) => {
                info!("Removed product '{}'", name);
                Ok(true)
            }
            Err(e) => {
                warn!("Removal of product '{}' was not saved: {}", name, e);
                Err(CatalogError::Persistence(e))
            }
        }
    }

    /// Apply `updated` in memory and in the store, ordered by the policy.
    ///
    /// Must be called with `write_lock` held.
    async fn commit(&self, updated: Vec<Product>) -> Result<Commit, CatalogError> {
        let blob = encode_snapshot(&updated)?;

        match self.policy {
            PersistFailurePolicy::KeepInMemory => {
                *self.products.write().await = Some(updated);
                let durable = self.write_snapshot(&blob).await;
                Ok(Commit {
                    visible: true,
                    durable,
                })
            }
            PersistFailurePolicy::Rollback => {
                let durable = self.write_snapshot(&blob).await;
                let visible = durable.is_ok();
                if visible {
                    *self.products.write().await = Some(updated);
                }
                Ok(Commit { visible, durable })
            }
        }
    }

    async fn write_snapshot(&self, blob: &str) -> Result<(), StoreError> {
        let start = Instant::now();
        let result = self.store.set(&self.snapshot_key, blob).await;
        let outcome = if result.is_ok() { "success" } else { "failed" };
        PERSIST_DURATION
            .with_label_values(&[outcome])
            .observe(start.elapsed().as_secs_f64());
        result
    }

    fn notify(&self, event: CatalogEvent) {
        // Send errors only mean nobody is subscribed
        let _ = self.events.send(CatalogEventEnvelope {
            timestamp: Utc::now(),
            event,
        });
    }
}

fn encode_snapshot(products: &[Product]) -> Result<String, CatalogError> {
    serde_json::to_string(products)
        .map_err(|e| CatalogError::Persistence(StoreError::Internal(e.to_string())))
}

/// Parse a stored snapshot, falling back to an empty catalog on any problem.
fn decode_snapshot(blob: &str) -> (Vec<Product>, LoadReport) {
    if blob.trim().is_empty() {
        return (Vec::new(), LoadReport::Fresh);
    }

    match serde_json::from_str::<Option<Vec<Product>>>(blob) {
        Ok(None) => (Vec::new(), LoadReport::Fresh),
        Ok(Some(products)) => {
            let products = drop_repeated_names(products);
            let count = products.len();
            (products, LoadReport::Restored { count })
        }
        Err(e) => {
            warn!("Catalog snapshot is corrupt, starting empty: {}", e);
            (
                Vec::new(),
                LoadReport::Recovered {
                    reason: e.to_string(),
                },
            )
        }
    }
}

/// Keep the first product for each name.
fn drop_repeated_names(products: Vec<Product>) -> Vec<Product> {
    let mut seen = HashSet::new();
    products
        .into_iter()
        .filter(|product| {
            let first = seen.insert(product.name.clone());
            if !first {
                warn!("Dropping repeated product '{}' from snapshot", product.name);
            }
            first
        })
        .collect()
}

fn error_label(error: &CatalogError) -> &'static str {
    match error {
        CatalogError::Validation { .. } => "validation",
        CatalogError::Duplicate(_) => "duplicate",
        CatalogError::Persistence(_) => "persistence",
        CatalogError::NotReady => "not_ready",
    }
}
