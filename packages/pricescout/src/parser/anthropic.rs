//! Anthropic implementation of the query parser.
//!
//! Claude may wrap the JSON object in prose, so the first `{...}` block is
//! extracted from the reply before parsing.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::{QueryParser, SHOPPING_SYSTEM_PROMPT};
use crate::error::{ParseError, ParseResult};
use crate::types::SearchFilters;

/// Anthropic messages API query parser.
#[derive(Clone)]
pub struct AnthropicParser {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

fn json_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").unwrap())
}

impl AnthropicParser {
    /// Create a new parser with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: "claude-sonnet-4-20250514".to_string(),
            base_url: "https://api.anthropic.com/v1".to_string(),
        }
    }

    /// Create from the `ANTHROPIC_API_KEY` environment variable.
    pub fn from_env() -> ParseResult<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| ParseError::Config("ANTHROPIC_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn complete(&self, query: &str) -> ParseResult<String> {
        let request = MessageRequest {
            model: self.model.clone(),
            max_tokens: 1024,
            system: SHOPPING_SYSTEM_PROMPT.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: query.to_string(),
            }],
        };

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ParseError::Ai(Box::new(e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ParseError::Ai(
                format!("Anthropic API error: {}", error_text).into(),
            ));
        }

        let message: MessageResponse = response
            .json()
            .await
            .map_err(|e| ParseError::Ai(Box::new(e)))?;

        message
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| ParseError::BadResponse("no text block in Anthropic response".into()))
    }
}

#[async_trait]
impl QueryParser for AnthropicParser {
    async fn parse(&self, query: &str) -> ParseResult<SearchFilters> {
        let content = self.complete(query).await?;

        let json_str = json_block_re()
            .find(&content)
            .map(|m| m.as_str())
            .ok_or_else(|| ParseError::BadResponse("no JSON object in response".into()))?;

        serde_json::from_str(json_str).map_err(ParseError::from)
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

// Request/Response types

#[derive(Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}
