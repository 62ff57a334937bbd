//! Session-scoped favorites endpoints.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::server::app::AppState;
use crate::server::error::{ApiError, FieldError};
use crate::server::routes::session_id;

/// GET /api/favorites
pub async fn list_favorites_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<Value> {
    let favorites = state.favorites.list(&session_id(&headers));
    Json(json!({ "success": true, "favorites": favorites }))
}

/// POST /api/favorites  `{ "productId": "web-newegg-0" }`
pub async fn add_favorite_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let product_id = body
        .as_ref()
        .and_then(|Json(v)| v.get("productId"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            ApiError::Validation(vec![FieldError::new("productId", "Product ID is required")])
        })?;

    let favorites = state.favorites.add(&session_id(&headers), product_id);
    Ok(Json(json!({ "success": true, "favorites": favorites })))
}

/// DELETE /api/favorites/:product_id
pub async fn remove_favorite_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> Json<Value> {
    let favorites = state.favorites.remove(&session_id(&headers), &product_id);
    Json(json!({ "success": true, "favorites": favorites }))
}
