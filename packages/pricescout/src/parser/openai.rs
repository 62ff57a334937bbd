//! OpenAI implementation of the query parser.
//!
//! Uses the chat completions API with JSON response format to turn a
//! shopping query into [`SearchFilters`].

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{QueryParser, SHOPPING_SYSTEM_PROMPT};
use crate::error::{ParseError, ParseResult};
use crate::types::SearchFilters;

/// OpenAI-based query parser.
#[derive(Clone)]
pub struct OpenAiParser {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiParser {
    /// Create a new parser with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: "gpt-4-turbo-preview".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> ParseResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ParseError::Config("OPENAI_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set the chat model (default: gpt-4-turbo-preview).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn chat(&self, query: &str) -> ParseResult<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SHOPPING_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: query.to_string(),
                },
            ],
            temperature: 0.3,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ParseError::Ai(Box::new(e)))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ParseError::Ai(
                format!("OpenAI API error: {}", error_text).into(),
            ));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ParseError::Ai(Box::new(e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ParseError::BadResponse("no choices in OpenAI response".into()))
    }
}

#[async_trait]
impl QueryParser for OpenAiParser {
    async fn parse(&self, query: &str) -> ParseResult<SearchFilters> {
        let content = self.chat(query).await?;

        // The model is asked for JSON only, but salvage a fenced block if
        // it wraps the object anyway.
        serde_json::from_str(&content).or_else(|_| {
            let json_str = content
                .trim()
                .trim_start_matches("```json")
                .trim_start_matches("```")
                .trim_end_matches("```")
                .trim();
            serde_json::from_str(json_str).map_err(ParseError::from)
        })
    }

    fn name(&self) -> &str {
        "openai"
    }
}

// Request/Response types

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}
