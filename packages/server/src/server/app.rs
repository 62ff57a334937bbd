//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Instant;

use axum::http::{StatusCode, Uri};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_governor::key_extractor::SmartIpKeyExtractor;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use pricescout::fetch::StoreFetcher;
use pricescout::parser::ParserStack;

use crate::analytics::Analytics;
use crate::favorites::Favorites;
use crate::history::PriceHistory;
use crate::server::routes::{
    add_favorite_handler, health_handler, list_favorites_handler, price_history_handler,
    product_detail_handler, remove_favorite_handler, search_handler, search_history_handler,
    similar_products_handler, store_detail_handler, stores_handler, suggestions_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub parser: Arc<ParserStack>,
    pub fetchers: Arc<Vec<Arc<dyn StoreFetcher>>>,
    pub favorites: Favorites,
    pub history: PriceHistory,
    pub analytics: Analytics,
    pub started: Instant,
}

impl AppState {
    pub fn new(parser: ParserStack, fetchers: Vec<Arc<dyn StoreFetcher>>) -> Self {
        Self {
            parser: Arc::new(parser),
            fetchers: Arc::new(fetchers),
            favorites: Favorites::new(),
            history: PriceHistory::new(),
            analytics: Analytics::new(),
            started: Instant::now(),
        }
    }
}

async fn not_found_handler(uri: Uri) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Route not found", "path": uri.path() })),
    )
}

/// Build the Axum application router.
///
/// The search endpoint carries a per-IP rate limit derived from the
/// window/max-requests pair; everything else is unlimited.
pub fn build_app(state: AppState, rate_limit_window_ms: u64, rate_limit_max_requests: u32) -> Router {
    // Average replenish interval over the window, with the full window
    // budget available as burst.
    let replenish_ms = (rate_limit_window_ms / u64::from(rate_limit_max_requests.max(1))).max(1);
    let rate_limit_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(replenish_ms)
            .burst_size(rate_limit_max_requests.max(1))
            .key_extractor(SmartIpKeyExtractor) // Extract IP from X-Forwarded-For header
            .finish()
            .expect("rate limiter configuration is valid and should never fail"),
    );
    let rate_limit_layer = GovernorLayer {
        config: rate_limit_config,
    };

    let search_routes = Router::new()
        .route("/api/search", post(search_handler))
        .layer(rate_limit_layer);

    Router::new()
        .merge(search_routes)
        .route("/api/search/history", get(search_history_handler))
        .route("/api/products/:id", get(product_detail_handler))
        .route("/api/products/:id/similar", get(similar_products_handler))
        .route("/api/stores", get(stores_handler))
        .route("/api/stores/:slug", get(store_detail_handler))
        .route("/api/suggestions", get(suggestions_handler))
        .route(
            "/api/favorites",
            get(list_favorites_handler).post(add_favorite_handler),
        )
        .route("/api/favorites/:product_id", delete(remove_favorite_handler))
        .route("/api/price-history/:product_id", get(price_history_handler))
        .route("/health", get(health_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
