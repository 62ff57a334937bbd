//! Per-retailer listing fetchers.
//!
//! Each fetcher builds the retailer's search URL, fetches the results page
//! through the shared [`StoreClient`], and hands the body to a synchronous
//! `parse_listings` function. Parsing never holds a parsed DOM across an
//! await point, and is unit-testable against fixture HTML.
//!
//! Selector lists are best-effort by design: retailer markup shifts under
//! us, so each fetcher tries an ordered list of strategies and settles for
//! an empty result set when none match.

pub mod amazon;
pub mod bestbuy;
pub mod bhphoto;
pub mod client;
pub mod microcenter;
pub mod newegg;
pub mod walmart;

use async_trait::async_trait;
use scraper::ElementRef;
use std::sync::Arc;

use crate::error::FetchResult;
use crate::types::{RawListing, StoreMeta};

pub use amazon::AmazonFetcher;
pub use bestbuy::BestBuyFetcher;
pub use bhphoto::BhPhotoFetcher;
pub use client::StoreClient;
pub use microcenter::MicroCenterFetcher;
pub use newegg::NeweggFetcher;
pub use walmart::WalmartFetcher;

/// A single retailer's search scraper.
#[async_trait]
pub trait StoreFetcher: Send + Sync {
    /// Retailer metadata (name, slug, homepage).
    fn meta(&self) -> &StoreMeta;

    /// Search the store and return whatever listings could be extracted.
    async fn search(&self, query: &str) -> FetchResult<Vec<RawListing>>;
}

/// All six production fetchers sharing one client.
pub fn default_fetchers(client: StoreClient) -> Vec<Arc<dyn StoreFetcher>> {
    vec![
        Arc::new(NeweggFetcher::new(client.clone())),
        Arc::new(AmazonFetcher::new(client.clone())),
        Arc::new(BestBuyFetcher::new(client.clone())),
        Arc::new(BhPhotoFetcher::new(client.clone())),
        Arc::new(MicroCenterFetcher::new(client.clone())),
        Arc::new(WalmartFetcher::new(client)),
    ]
}

/// Extract the first dollar amount from scraped price text.
///
/// Price nodes often carry more than one figure ("$1,299.99 was $1,499.99"),
/// so only the first number is taken. Returns `None` for empty or
/// non-positive results.
pub(crate) fn parse_price(text: &str) -> Option<f64> {
    static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    let re = RE.get_or_init(|| {
        regex::Regex::new(r"\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?").unwrap()
    });
    let m = re.find(text)?;
    let price: f64 = m.as_str().replace(',', "").parse().ok()?;
    (price > 0.0).then_some(price)
}

/// Text of the first element under `el` matching any of the comma-separated
/// selectors, trimmed. `None` when nothing matches or the text is empty.
pub(crate) fn first_text(el: &ElementRef, selectors: &str) -> Option<String> {
    let selector = scraper::Selector::parse(selectors).ok()?;
    el.select(&selector)
        .next()
        .map(|m| m.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

/// First matching attribute value under `el`.
pub(crate) fn first_attr(el: &ElementRef, selectors: &str, attr: &str) -> Option<String> {
    let selector = scraper::Selector::parse(selectors).ok()?;
    el.select(&selector)
        .next()
        .and_then(|m| m.value().attr(attr))
        .map(|v| v.to_string())
}

/// Prefer `src`, fall back to `data-src` (lazy-loaded images).
pub(crate) fn first_image(el: &ElementRef, selectors: &str) -> Option<String> {
    first_attr(el, selectors, "src").or_else(|| first_attr(el, selectors, "data-src"))
}

/// Resolve a possibly-relative href against the store's base URL.
pub(crate) fn absolutize(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}{}", base.trim_end_matches('/'), href)
    }
}
