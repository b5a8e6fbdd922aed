//! Product catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use shelfkeeper_core::{CatalogError, Product, ProductCandidate};
use tracing::warn;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ProductQueryParams {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub total: usize,
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub removed: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// HTTP status for a catalog error.
pub fn error_status(error: &CatalogError) -> StatusCode {
    match error {
        CatalogError::Validation { .. } => StatusCode::BAD_REQUEST,
        CatalogError::Duplicate(_) => StatusCode::CONFLICT,
        CatalogError::Persistence(_) | CatalogError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn api_error(error: CatalogError) -> ApiError {
    let status = error_status(&error);
    if status.is_server_error() {
        warn!("Catalog request failed: {}", error);
    }
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

/// Unreadable request bodies keep the extractor's status but use the JSON error shape.
fn rejection_error(rejection: JsonRejection) -> ApiError {
    (
        rejection.status(),
        Json(ErrorResponse {
            error: rejection.body_text(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/products
///
/// List the catalog, filtered by `query` when present.
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ProductQueryParams>,
) -> Result<Json<ProductListResponse>, ApiError> {
    let query = params.query.unwrap_or_default();
    let products = state
        .catalog()
        .filtered_view(&query)
        .await
        .map_err(api_error)?;

    Ok(Json(ProductListResponse {
        total: products.len(),
        products,
        query,
    }))
}

/// POST /api/v1/products
///
/// Add a product. Missing fields are reported together in the error message.
pub async fn add_product(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProductCandidate>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(candidate) = payload.map_err(rejection_error)?;
    let product = state
        .catalog()
        .add_product(candidate)
        .await
        .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// DELETE /api/v1/products/{name}
///
/// Remove a product by exact name. Removing an absent name is not an error.
pub async fn remove_product(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<RemoveResponse>, ApiError> {
    let removed = state
        .catalog()
        .remove_product(&name)
        .await
        .map_err(api_error)?;
    Ok(Json(RemoveResponse { removed }))
}
