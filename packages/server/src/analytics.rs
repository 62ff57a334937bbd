//! In-memory search analytics.
//!
//! Tracking is fire-and-forget from the search handler; nothing here can
//! fail a request. Entries are capped to bound memory.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use pricescout::SearchFilters;

const MAX_ENTRIES: usize = 1000;

/// One tracked search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub query: String,
    #[serde(skip)]
    pub filters: SearchFilters,
    pub result_count: usize,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct Analytics {
    searches: Arc<RwLock<Vec<SearchRecord>>>,
}

impl Analytics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_search(
        &self,
        query: &str,
        filters: &SearchFilters,
        result_count: usize,
        duration_ms: u64,
        session_id: Option<&str>,
    ) {
        let Ok(mut searches) = self.searches.write() else {
            return;
        };
        searches.push(SearchRecord {
            query: query.to_string(),
            filters: filters.clone(),
            result_count,
            duration_ms,
            session_id: session_id.map(str::to_string),
            timestamp: Utc::now(),
        });
        if searches.len() > MAX_ENTRIES {
            let excess = searches.len() - MAX_ENTRIES;
            searches.drain(..excess);
        }
    }

    /// Most recent searches, newest first.
    pub fn recent(&self, limit: usize) -> Vec<SearchRecord> {
        self.searches
            .read()
            .map(|s| s.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Most frequent queries over the last `days` days.
    pub fn popular(&self, limit: usize, days: i64) -> Vec<(String, usize)> {
        let cutoff = Utc::now() - Duration::days(days.max(1));
        let Ok(searches) = self.searches.read() else {
            return Vec::new();
        };

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in searches.iter().filter(|r| r.timestamp >= cutoff) {
            *counts.entry(record.query.as_str()).or_default() += 1;
        }

        let mut ranked: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(q, n)| (q.to_string(), n))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }
}
