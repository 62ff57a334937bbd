//! Natural-language query parsing.
//!
//! The [`QueryParser`] trait is the seam: AI-backed implementations
//! ([`OpenAiParser`], [`AnthropicParser`]) sit behind it, and
//! [`ParserStack`] wraps whichever is configured with the deterministic
//! [`fallback`] parser so parsing can never fail a search request.

pub mod anthropic;
pub mod fallback;
pub mod openai;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::ParseResult;
use crate::types::SearchFilters;

pub use anthropic::AnthropicParser;
pub use openai::OpenAiParser;

/// System prompt shared by the AI parsers.
pub(crate) const SHOPPING_SYSTEM_PROMPT: &str = r#"You are an expert shopping query parser.
Your job is to convert natural language shopping queries into structured JSON filters.

Extract the following information:
- category: product category (laptops, smartphones, monitors, headphones, etc.)
- brand: brand name(s) if mentioned
- minPrice: minimum price (numeric)
- maxPrice: maximum price (numeric)
- specs: specific technical specifications mentioned (cpu, gpu, ram, storage)
- features: general features (wireless, noise-cancellation, RGB, etc.)
- keywords: important search keywords

Return ONLY valid JSON, no explanations. Example:

User: "gaming laptops with RTX 5090 under $3000"
Response:
{
  "category": "laptops",
  "maxPrice": 3000,
  "specs": {
    "gpu": "RTX 5090"
  },
  "keywords": ["gaming", "laptop", "RTX 5090"],
  "features": ["gaming"]
}

User: "wireless headphones with noise cancellation under $200"
Response:
{
  "category": "headphones",
  "maxPrice": 200,
  "features": ["wireless", "noise cancellation"],
  "keywords": ["wireless", "headphones", "noise cancellation"]
}"#;

/// Turns a free-text shopping query into structured filters.
#[async_trait]
pub trait QueryParser: Send + Sync {
    async fn parse(&self, query: &str) -> ParseResult<SearchFilters>;

    /// Parser name for logging.
    fn name(&self) -> &str {
        "unknown"
    }
}

/// AI parser with silent regex fallback.
///
/// AI failures are logged and absorbed: the caller always gets filters.
pub struct ParserStack {
    ai: Option<Arc<dyn QueryParser>>,
}

impl ParserStack {
    /// Stack with an AI parser in front of the fallback.
    pub fn with_ai(ai: Arc<dyn QueryParser>) -> Self {
        Self { ai: Some(ai) }
    }

    /// Fallback-only stack (no AI configured).
    pub fn fallback_only() -> Self {
        Self { ai: None }
    }

    /// Parse a query. Infallible by construction.
    pub async fn parse(&self, query: &str) -> SearchFilters {
        if let Some(ai) = &self.ai {
            match ai.parse(query).await {
                Ok(filters) => {
                    debug!(parser = ai.name(), ?filters, "query parsed");
                    return filters;
                }
                Err(e) => {
                    warn!(parser = ai.name(), error = %e, "AI parse failed, using fallback");
                }
            }
        }
        fallback::parse(query)
    }
}

/// Curated query suggestions, substring filtered, max five.
pub fn suggestions(partial: &str) -> Vec<String> {
    const SUGGESTIONS: &[&str] = &[
        "gaming laptops with RTX 5090 under $3000",
        "best budget smartphones under $500",
        "4K monitors 27 inch for photo editing",
        "wireless headphones with noise cancellation",
        "mechanical keyboards with RGB under $150",
        "gaming chairs under $300",
        "ultrawide monitors for programming",
        "laptops for data science with 32GB RAM",
        "best webcams for streaming under $200",
        "portable SSDs 2TB for backup",
        "ergonomic mouse for productivity",
        "standing desks with electric adjustment",
        "iPad for note-taking and drawing",
        "budget Android phones with good camera",
        "gaming mice under $100",
    ];

    let lower = partial.trim().to_lowercase();
    SUGGESTIONS
        .iter()
        .filter(|s| lower.is_empty() || s.to_lowercase().contains(&lower))
        .take(5)
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockQueryParser;

    #[tokio::test]
    async fn stack_prefers_ai_result() {
        let ai = MockQueryParser::new().with_filters(
            "cheap laptops",
            SearchFilters {
                category: Some("laptops".into()),
                ..Default::default()
            },
        );
        let stack = ParserStack::with_ai(Arc::new(ai));

        let filters = stack.parse("cheap laptops").await;
        assert_eq!(filters.category.as_deref(), Some("laptops"));
    }

    #[tokio::test]
    async fn stack_falls_back_silently_on_ai_error() {
        let ai = MockQueryParser::failing();
        let stack = ParserStack::with_ai(Arc::new(ai));

        let filters = stack.parse("gaming laptops under $3000").await;
        // Fallback heuristics still produce a usable filter.
        assert_eq!(filters.max_price, Some(3000.0));
        assert_eq!(filters.category.as_deref(), Some("laptops"));
    }

    #[tokio::test]
    async fn fallback_only_stack_uses_heuristics() {
        let stack = ParserStack::fallback_only();
        let filters = stack.parse("monitors under $400").await;
        assert_eq!(filters.max_price, Some(400.0));
    }

    #[test]
    fn suggestions_empty_prefix_returns_top_five() {
        assert_eq!(suggestions("").len(), 5);
    }

    #[test]
    fn suggestions_filter_by_substring() {
        let results = suggestions("gaming");
        assert!(!results.is_empty());
        assert!(results.iter().all(|s| s.to_lowercase().contains("gaming")));
    }
}
