//! Natural-language product search.

use std::time::Instant;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, info};

use pricescout::aggregate;
use pricescout::rank;

use crate::server::app::AppState;
use crate::server::error::{ApiError, FieldError};
use crate::server::routes::session_id;

const MIN_QUERY_CHARS: usize = 2;
const MAX_QUERY_CHARS: usize = 500;

/// Sanitize and validate the raw query string.
///
/// Angle brackets are stripped before validation so "<b>tv</b>" style
/// payloads cannot reach the scrapers or be echoed back.
fn validate_query(raw: Option<&str>) -> Result<String, ApiError> {
    let field = |message: &str| {
        ApiError::Validation(vec![FieldError::new("query", message)])
    };

    let Some(raw) = raw else {
        return Err(field("Search query is required"));
    };

    let cleaned: String = raw.chars().filter(|c| *c != '<' && *c != '>').collect();
    let cleaned = cleaned.trim().to_string();

    if cleaned.is_empty() {
        return Err(field("Search query cannot be empty"));
    }
    if cleaned.chars().count() < MIN_QUERY_CHARS {
        return Err(field("Search query must be at least 2 characters"));
    }
    if cleaned.chars().count() > MAX_QUERY_CHARS {
        return Err(field("Search query cannot exceed 500 characters"));
    }
    Ok(cleaned)
}

/// POST /api/search
///
/// Pipeline: parse the query into filters, fan the scrape out to every
/// store, aggregate listings into products, rank. Analytics and price
/// history recording happen off the request path.
pub async fn search_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let started = Instant::now();

    let raw_query = body
        .as_ref()
        .and_then(|Json(v)| v.get("query"))
        .and_then(Value::as_str);
    let query = validate_query(raw_query)?;

    info!(query = %query, "search request received");

    let filters = state.parser.parse(&query).await;
    debug!(?filters, "parsed filters");

    let mut scrape_query = aggregate::build_search_query(&filters);
    if scrape_query.is_empty() {
        scrape_query = query.clone();
    }

    let listings = aggregate::search_all_stores(&state.fetchers, &scrape_query).await;
    debug!(count = listings.len(), "listings fetched");

    let products = aggregate::build_products(listings, &filters);
    let ranked = rank::rank_products(products, &filters);

    let count = ranked.len();
    let duration_ms = started.elapsed().as_millis() as u64;
    info!(results = count, duration_ms, "search completed");

    // Off the request path: tracking failures never affect the response.
    {
        let analytics = state.analytics.clone();
        let history = state.history.clone();
        let query = query.clone();
        let filters = filters.clone();
        let session = session_id(&headers);
        let ranked = ranked.clone();
        tokio::spawn(async move {
            analytics.track_search(&query, &filters, ranked.len(), duration_ms, Some(&session));
            history.record(&ranked);
        });
    }

    Ok(Json(json!({
        "success": true,
        "query": query,
        "filters": filters,
        "results": ranked,
        "count": count,
    })))
}

/// GET /api/search/history
///
/// Recent queries plus the most frequent ones over the last week.
pub async fn search_history_handler(State(state): State<AppState>) -> Json<Value> {
    let history: Vec<Value> = state
        .analytics
        .recent(10)
        .into_iter()
        .map(|record| {
            json!({
                "query": record.query,
                "timestamp": record.timestamp,
            })
        })
        .collect();

    let popular: Vec<Value> = state
        .analytics
        .popular(5, 7)
        .into_iter()
        .map(|(query, count)| json!({ "query": query, "count": count }))
        .collect();

    Json(json!({ "success": true, "history": history, "popular": popular }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_empty_and_short_queries() {
        assert!(validate_query(None).is_err());
        assert!(validate_query(Some("")).is_err());
        assert!(validate_query(Some("   ")).is_err());
        assert!(validate_query(Some("a")).is_err());
    }

    #[test]
    fn rejects_oversized_query() {
        let long = "x".repeat(501);
        assert!(validate_query(Some(&long)).is_err());
        let max = "x".repeat(500);
        assert!(validate_query(Some(&max)).is_ok());
    }

    #[test]
    fn strips_angle_brackets_and_trims() {
        assert_eq!(
            validate_query(Some("  <b>gaming laptop</b>  ")).unwrap(),
            "bgaming laptop/b"
        );
        assert_eq!(validate_query(Some("gaming laptop")).unwrap(), "gaming laptop");
    }
}
