//! Shared HTTP client for store fetchers.
//!
//! Retailer search pages are hostile to obvious bots, so the client rotates
//! user agents, sends a realistic browser header set, sleeps a short random
//! delay before each request, and retries transient transport failures with
//! exponential backoff. HTTP 4xx is never retried.

use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue};
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{FetchError, FetchResult};

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
];

/// HTTP client shared by all store fetchers.
#[derive(Clone)]
pub struct StoreClient {
    client: reqwest::Client,
    max_retries: u32,
    base_backoff: Duration,
    pre_delay: bool,
}

impl Default for StoreClient {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreClient {
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("en-US,en;q=0.9"),
        );
        headers.insert(
            reqwest::header::CONNECTION,
            HeaderValue::from_static("keep-alive"),
        );
        headers.insert(
            reqwest::header::UPGRADE_INSECURE_REQUESTS,
            HeaderValue::from_static("1"),
        );
        headers.insert(reqwest::header::DNT, HeaderValue::from_static("1"));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(25))
            .redirect(reqwest::redirect::Policy::limited(5))
            .default_headers(headers)
            .gzip(true)
            .build()
            .expect("store HTTP client options are static and valid");

        Self {
            client,
            max_retries: 3,
            base_backoff: Duration::from_millis(500),
            pre_delay: true,
        }
    }

    /// Override the retry count (0 disables retries).
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Disable the random pre-request delay (tests).
    pub fn without_delay(mut self) -> Self {
        self.pre_delay = false;
        self
    }

    /// Backoff before retry `attempt` (1-based), doubling each time.
    ///
    /// The exponent is clamped so a large retry configuration saturates
    /// instead of overflowing.
    fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1).min(16));
        self.base_backoff.saturating_mul(factor)
    }

    /// Fetch a search page and return its HTML body.
    ///
    /// 403 maps to [`FetchError::Blocked`] so callers can distinguish bot
    /// walls from genuine failures; other non-success statuses map to
    /// [`FetchError::Status`].
    pub async fn get_html(&self, url: &str, referer: &str) -> FetchResult<String> {
        if self.pre_delay {
            // Drawn before the await: thread_rng is not Send.
            let jitter = rand::thread_rng().gen_range(100..500);
            tokio::time::sleep(Duration::from_millis(jitter)).await;
        }

        let mut last_error: Option<FetchError> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = self.backoff_for(attempt);
                debug!(url = %url, attempt, backoff_ms = backoff.as_millis() as u64, "retrying fetch");
                tokio::time::sleep(backoff).await;
            }

            let user_agent = {
                let idx = rand::thread_rng().gen_range(0..USER_AGENTS.len());
                USER_AGENTS[idx]
            };

            let result = self
                .client
                .get(url)
                .header("User-Agent", user_agent)
                .header("Referer", referer)
                .send()
                .await;

            match result {
                Ok(response) => {
                    let status = response.status();
                    if status.as_u16() == 403 {
                        return Err(FetchError::Blocked {
                            store: referer.to_string(),
                        });
                    }
                    if !status.is_success() {
                        return Err(FetchError::Status {
                            status: status.as_u16(),
                        });
                    }
                    return response
                        .text()
                        .await
                        .map_err(|e| FetchError::Http(Box::new(e)));
                }
                Err(e) if e.is_timeout() => {
                    warn!(url = %url, attempt, "fetch timed out");
                    last_error = Some(FetchError::Timeout {
                        url: url.to_string(),
                    });
                }
                Err(e) if e.is_connect() => {
                    warn!(url = %url, attempt, error = %e, "connection failed");
                    last_error = Some(FetchError::Http(Box::new(e)));
                }
                Err(e) => {
                    // Non-transient transport error: do not retry.
                    return Err(FetchError::Http(Box::new(e)));
                }
            }
        }

        Err(last_error.unwrap_or(FetchError::Timeout {
            url: url.to_string(),
        }))
    }
}
