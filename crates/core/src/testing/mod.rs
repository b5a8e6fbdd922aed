//! Testing utilities and mock implementations.
//!
//! This module provides a controllable key/value store and product
//! fixtures, so catalog behaviour can be exercised without touching disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use shelfkeeper_core::testing::{fixtures, MockKeyValueStore};
//!
//! let store = Arc::new(MockKeyValueStore::new());
//! let repo = CatalogRepository::with_defaults(store.clone());
//! repo.load().await;
//!
//! repo.add_product(fixtures::candidate("Mouse")).await?;
//! assert!(store.stored("products").await.is_some());
//! ```

mod mock_store;

pub use mock_store::MockKeyValueStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::{Product, ProductCandidate};

    /// Local image URI for a product, the way the image picker hands them out.
    pub fn image_uri(name: &str) -> String {
        format!(
            "file:///data/user/0/shelfkeeper/cache/{}.jpg",
            name.to_lowercase().replace(' ', "-")
        )
    }

    /// A valid product with reasonable defaults.
    pub fn product(name: &str) -> Product {
        Product::new(name, "10", image_uri(name))
    }

    /// A valid candidate with reasonable defaults.
    pub fn candidate(name: &str) -> ProductCandidate {
        ProductCandidate::from(product(name))
    }

    /// A valid candidate with an explicit price.
    pub fn priced_candidate(name: &str, price: &str) -> ProductCandidate {
        ProductCandidate {
            price: price.to_string(),
            ..candidate(name)
        }
    }
}
