//! Retailer catalog endpoints.

use axum::extract::Path;
use axum::Json;
use serde_json::{json, Value};

use pricescout::stores;

use crate::server::error::ApiError;

/// GET /api/stores
pub async fn stores_handler() -> Json<Value> {
    Json(json!({ "success": true, "stores": stores::all() }))
}

/// GET /api/stores/:slug
pub async fn store_detail_handler(Path(slug): Path<String>) -> Result<Json<Value>, ApiError> {
    let store = stores::by_slug(&slug)
        .ok_or_else(|| ApiError::NotFound("Store not found".to_string()))?;
    Ok(Json(json!({ "success": true, "store": store })))
}
