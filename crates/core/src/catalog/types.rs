//! Types for the local product catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::store::StoreError;

/// A product entry in the catalog.
///
/// `name` is the catalog's natural key. `price` is kept as entered and
/// `image` is an opaque local file URI supplied by the image picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub price: String,
    pub image: String,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            image: image.into(),
        }
    }
}

/// A product submitted for addition, not yet validated.
///
/// Missing fields deserialize as empty strings so that validation, not the
/// parser, reports them. `price` also accepts a JSON number and keeps its
/// textual form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCandidate {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "price_text")]
    pub price: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PriceInput {
    Text(String),
    Number(serde_json::Number),
}

fn price_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<PriceInput>::deserialize(deserializer)? {
        Some(PriceInput::Text(text)) => text,
        Some(PriceInput::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

impl ProductCandidate {
    /// Names of required fields that are empty.
    ///
    /// Only the empty string counts as missing; whitespace is accepted as-is.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("name");
        }
        if self.price.is_empty() {
            missing.push("price");
        }
        if self.image.is_empty() {
            missing.push("image");
        }
        missing
    }

    /// Validate and convert into a [`Product`].
    pub fn validate(self) -> Result<Product, CatalogError> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(CatalogError::Validation { missing });
        }
        Ok(Product {
            name: self.name,
            price: self.price,
            image: self.image,
        })
    }
}

impl From<Product> for ProductCandidate {
    fn from(product: Product) -> Self {
        Self {
            name: product.name,
            price: product.price,
            image: product.image,
        }
    }
}

/// Outcome of loading the persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LoadReport {
    /// Nothing was stored yet; the catalog starts empty.
    Fresh,
    /// The snapshot was read back.
    Restored { count: usize },
    /// The snapshot could not be read or parsed; the catalog starts empty.
    Recovered { reason: String },
}

impl LoadReport {
    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            LoadReport::Fresh => "fresh",
            LoadReport::Restored { .. } => "restored",
            LoadReport::Recovered { .. } => "recovered",
        }
    }
}

/// Change notification emitted by the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEvent {
    /// The catalog was (re)loaded from the store.
    Loaded { count: usize },
    /// A product was appended.
    ProductAdded { name: String, durable: bool },
    /// A product was removed.
    ProductRemoved { name: String, durable: bool },
}

impl CatalogEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            CatalogEvent::Loaded { .. } => "loaded",
            CatalogEvent::ProductAdded { .. } => "product_added",
            CatalogEvent::ProductRemoved { .. } => "product_removed",
        }
    }
}

/// Envelope wrapping a catalog event with the time it happened.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEventEnvelope {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub event: CatalogEvent,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("All fields are required (missing: {})", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },

    #[error("Product already exists: {0}")]
    Duplicate(String),

    #[error("Failed to save products: {0}")]
    Persistence(#[from] StoreError),

    #[error("Catalog not loaded yet")]
    NotReady,
}
