use axum::Json;
use shelfkeeper_core::{accessories, Accessory};

/// GET /api/v1/accessories
pub async fn list_accessories() -> Json<&'static [Accessory]> {
    Json(accessories())
}
