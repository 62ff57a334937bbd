pub mod favorites;
pub mod health;
pub mod price_history;
pub mod products;
pub mod search;
pub mod stores;
pub mod suggestions;

pub use favorites::{add_favorite_handler, list_favorites_handler, remove_favorite_handler};
pub use health::health_handler;
pub use price_history::price_history_handler;
pub use products::{product_detail_handler, similar_products_handler};
pub use search::{search_handler, search_history_handler};
pub use stores::{store_detail_handler, stores_handler};
pub use suggestions::suggestions_handler;

use axum::http::HeaderMap;

pub(crate) const DEFAULT_SESSION: &str = "demo-session";

/// The caller's session id, from the X-Session-Id header.
pub(crate) fn session_id(headers: &HeaderMap) -> String {
    headers
        .get("x-session-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SESSION)
        .to_string()
}
