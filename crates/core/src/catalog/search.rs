//! Search projection: the filtered view of the catalog for a query string.

use std::sync::Arc;

use super::{CatalogError, CatalogRepository, Product};

/// Filter products by a case-insensitive substring match on the name.
///
/// An empty query returns every product. Matches keep their catalog order.
pub fn filter_products(products: &[Product], query: &str) -> Vec<Product> {
    if query.is_empty() {
        return products.to_vec();
    }

    let needle = query.to_lowercase();
    products
        .iter()
        .filter(|product| product.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Live search state bound to a repository.
///
/// Holds the current query and the last computed view. Call [`refresh`]
/// after a catalog change (e.g. on each event from
/// [`CatalogRepository::subscribe`]) and [`set_query`] when the user types.
///
/// [`refresh`]: SearchProjection::refresh
/// [`set_query`]: SearchProjection::set_query
pub struct SearchProjection {
    repository: Arc<CatalogRepository>,
    query: String,
    view: Vec<Product>,
}

impl SearchProjection {
    pub fn new(repository: Arc<CatalogRepository>) -> Self {
        Self {
            repository,
            query: String::new(),
            view: Vec::new(),
        }
    }

    /// Current query text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Products matching the current query as of the last recompute.
    pub fn view(&self) -> &[Product] {
        &self.view
    }

    /// Replace the query and recompute the view.
    pub async fn set_query(&mut self, query: impl Into<String>) -> Result<&[Product], CatalogError> {
        self.query = query.into();
        self.refresh().await
    }

    /// Recompute the view against the repository's current catalog.
    pub async fn refresh(&mut self) -> Result<&[Product], CatalogError> {
        self.view = self.repository.filtered_view(&self.query).await?;
        Ok(&self.view)
    }
}
