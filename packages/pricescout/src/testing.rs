//! Test doubles for the parser and fetcher seams.
//!
//! Available to downstream crates' tests as well as this one's, so the
//! module is compiled unconditionally.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult, ParseError, ParseResult};
use crate::fetch::StoreFetcher;
use crate::parser::QueryParser;
use crate::types::{RawListing, SearchFilters, StoreMeta};

/// Scripted [`QueryParser`] with per-query canned filters and call tracking.
pub struct MockQueryParser {
    responses: HashMap<String, SearchFilters>,
    fail: bool,
    calls: Arc<RwLock<Vec<String>>>,
}

impl Default for MockQueryParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MockQueryParser {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            fail: false,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// A parser whose every call errors, for exercising fallback paths.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Script the filters returned for an exact query.
    pub fn with_filters(mut self, query: impl Into<String>, filters: SearchFilters) -> Self {
        self.responses.insert(query.into(), filters);
        self
    }

    /// Queries this mock has been asked to parse, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl QueryParser for MockQueryParser {
    async fn parse(&self, query: &str) -> ParseResult<SearchFilters> {
        if let Ok(mut calls) = self.calls.write() {
            calls.push(query.to_string());
        }
        if self.fail {
            return Err(ParseError::BadResponse("mock parser failure".into()));
        }
        self.responses
            .get(query)
            .cloned()
            .ok_or_else(|| ParseError::BadResponse(format!("no scripted response for: {query}")))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Scripted [`StoreFetcher`] returning canned listings or a canned error.
pub struct MockStoreFetcher {
    meta: StoreMeta,
    listings: Vec<RawListing>,
    fail: bool,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockStoreFetcher {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            meta: StoreMeta::new(name, slug.clone(), format!("https://{slug}.test"), "mock"),
            listings: Vec::new(),
            fail: false,
            calls: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn with_listings(mut self, listings: Vec<RawListing>) -> Self {
        self.listings = listings;
        self
    }

    /// Every search returns a timeout error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Queries this mock has been searched with, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl StoreFetcher for MockStoreFetcher {
    fn meta(&self) -> &StoreMeta {
        &self.meta
    }

    async fn search(&self, query: &str) -> FetchResult<Vec<RawListing>> {
        if let Ok(mut calls) = self.calls.write() {
            calls.push(query.to_string());
        }
        if self.fail {
            return Err(FetchError::Timeout {
                url: self.meta.url.clone(),
            });
        }
        Ok(self.listings.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_parser_returns_scripted_filters_and_tracks_calls() {
        let parser = MockQueryParser::new().with_filters(
            "cheap laptops",
            SearchFilters {
                category: Some("laptops".into()),
                ..Default::default()
            },
        );

        let filters = parser.parse("cheap laptops").await.unwrap();
        assert_eq!(filters.category.as_deref(), Some("laptops"));
        assert!(parser.parse("unscripted query").await.is_err());
        assert_eq!(parser.calls(), vec!["cheap laptops", "unscripted query"]);
    }

    #[tokio::test]
    async fn mock_fetcher_fails_on_demand() {
        let ok = MockStoreFetcher::new("Newegg", "newegg")
            .with_listings(vec![RawListing::new("Laptop", 999.0, "Newegg", "newegg")]);
        assert_eq!(ok.search("laptop").await.unwrap().len(), 1);

        let bad = MockStoreFetcher::new("Amazon", "amazon").failing();
        assert!(bad.search("laptop").await.is_err());
        assert_eq!(bad.calls(), vec!["laptop"]);
    }
}
