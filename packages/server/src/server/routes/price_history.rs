//! Product price history endpoint.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::history::DEFAULT_DAYS;
use crate::server::app::AppState;

#[derive(Deserialize)]
pub struct PriceHistoryParams {
    days: Option<i64>,
    store: Option<String>,
}

/// GET /api/price-history/:product_id?days=30&store=newegg
pub async fn price_history_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Query(params): Query<PriceHistoryParams>,
) -> Json<Value> {
    let days = params.days.unwrap_or(DEFAULT_DAYS);
    let history = state
        .history
        .for_product(&product_id, params.store.as_deref(), days);

    Json(json!({ "success": true, "history": history }))
}
