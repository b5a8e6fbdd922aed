use std::sync::Arc;
use shelfkeeper_core::{CatalogRepository, Config, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    catalog: Arc<CatalogRepository>,
}

impl AppState {
    pub fn new(config: Config, catalog: Arc<CatalogRepository>) -> Self {
        Self { config, catalog }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn catalog(&self) -> &CatalogRepository {
        self.catalog.as_ref()
    }
}
