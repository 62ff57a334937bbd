//! Query autocomplete suggestions.

use axum::extract::Query;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use pricescout::parser;

#[derive(Deserialize)]
pub struct SuggestionsParams {
    #[serde(default)]
    q: String,
}

/// GET /api/suggestions?q=gaming
pub async fn suggestions_handler(Query(params): Query<SuggestionsParams>) -> Json<Value> {
    let suggestions = parser::suggestions(&params.q);
    Json(json!({ "success": true, "suggestions": suggestions }))
}
