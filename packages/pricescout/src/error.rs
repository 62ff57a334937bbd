//! Typed errors for the price search library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur while parsing a natural-language query.
#[derive(Debug, Error)]
pub enum ParseError {
    /// AI service unavailable or failed
    #[error("AI service error: {0}")]
    Ai(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// AI replied, but no usable JSON could be recovered
    #[error("unparseable AI response: {0}")]
    BadResponse(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error (missing API key, bad model name)
    #[error("config error: {0}")]
    Config(String),
}

/// Errors that can occur while fetching listings from a store.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP transport failed after retries
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-success status from the store
    #[error("store returned HTTP {status}")]
    Status { status: u16 },

    /// Store blocked the request (403 / bot wall)
    #[error("blocked by store: {store}")]
    Blocked { store: String },

    /// Request timed out
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Search URL could not be built
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Result type alias for parser operations.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
