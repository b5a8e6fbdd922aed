pub mod catalog;
pub mod config;
pub mod metrics;
pub mod store;
pub mod testing;

pub use catalog::{
    accessories, filter_products, Accessory, Availability, CatalogError, CatalogEvent,
    CatalogEventEnvelope, CatalogRepository, LoadReport, Product, ProductCandidate,
    SearchProjection,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CatalogConfig, Config, ConfigError,
    PersistFailurePolicy, SanitizedConfig, ServerConfig, StorageBackend, StorageConfig,
};
pub use store::{
    create_store, KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError,
    DEFAULT_SNAPSHOT_KEY, SESSION_TOKEN_KEY,
};
