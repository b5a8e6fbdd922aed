//! Local product catalog.
//!
//! The [`CatalogRepository`] owns the canonical, insertion-ordered product
//! list and mirrors it as a single JSON snapshot in a [`KeyValueStore`].
//! [`filter_products`] and [`SearchProjection`] derive the searchable view
//! shown to the user; [`accessories`] is a fixed read-only list displayed
//! alongside it.
//!
//! [`KeyValueStore`]: crate::store::KeyValueStore

mod accessories;
mod repository;
mod search;
mod types;

pub use accessories::{accessories, Accessory, Availability};
pub use repository::CatalogRepository;
pub use search::{filter_products, SearchProjection};
pub use types::*;
