use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    8080
}

/// Durable store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Which key/value backend holds the persisted snapshot
    #[serde(default)]
    pub backend: StorageBackend,
    /// SQLite database file (ignored by the memory backend)
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// Key under which the full catalog snapshot is stored
    #[serde(default = "default_snapshot_key")]
    pub snapshot_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_db_path(),
            snapshot_key: default_snapshot_key(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("shelfkeeper.db")
}

fn default_snapshot_key() -> String {
    crate::store::DEFAULT_SNAPSHOT_KEY.to_string()
}

/// Available key/value backends
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Sqlite,
    Memory,
}

/// Catalog behaviour configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// What happens to the in-memory catalog when a snapshot commit fails
    #[serde(default)]
    pub on_persist_failure: PersistFailurePolicy,
    /// Capacity of the catalog event channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            on_persist_failure: PersistFailurePolicy::default(),
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_event_buffer() -> usize {
    256
}

/// Consistency policy for mutations whose snapshot commit fails.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PersistFailurePolicy {
    /// Apply the change in memory first and keep it even if the commit fails.
    #[default]
    KeepInMemory,
    /// Commit first; only apply the change in memory once it is durable.
    Rollback,
}

/// Sanitized config for API responses (filesystem paths hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub storage: SanitizedStorageConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStorageConfig {
    pub backend: String,
    pub snapshot_key: String,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            storage: SanitizedStorageConfig {
                backend: match config.storage.backend {
                    StorageBackend::Sqlite => "sqlite".to_string(),
                    StorageBackend::Memory => "memory".to_string(),
                },
                snapshot_key: config.storage.snapshot_key.clone(),
            },
            catalog: config.catalog.clone(),
        }
    }
}
