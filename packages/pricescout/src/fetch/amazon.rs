//! Amazon search scraper.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::{absolutize, first_attr, first_text, parse_price, StoreClient, StoreFetcher};
use crate::error::FetchResult;
use crate::types::{RawListing, StoreMeta};

const BASE: &str = "https://www.amazon.com";
const MAX_LISTINGS: usize = 20;

pub struct AmazonFetcher {
    client: StoreClient,
    meta: StoreMeta,
}

impl AmazonFetcher {
    pub fn new(client: StoreClient) -> Self {
        Self {
            client,
            meta: StoreMeta::new("Amazon", "amazon", BASE, "Everything store"),
        }
    }

    fn search_url(query: &str) -> FetchResult<Url> {
        Ok(Url::parse_with_params(&format!("{}/s", BASE), &[("k", query)])?)
    }

    /// Extract listings from an Amazon search results page.
    ///
    /// Amazon does not expose stock state on the results grid, so listings
    /// are assumed in stock.
    pub fn parse_listings(html: &str) -> Vec<RawListing> {
        let document = Html::parse_document(html);
        let result = match Selector::parse(r#"[data-component-type="s-search-result"]"#) {
            Ok(s) => s,
            Err(_) => return Vec::new(),
        };

        let mut listings: Vec<RawListing> = Vec::new();
        for el in document.select(&result).take(MAX_LISTINGS) {
            let Some(name) = first_text(&el, "h2 span") else {
                continue;
            };
            if listings.iter().any(|l| l.name == name) {
                continue;
            }

            // a-price-whole sometimes carries the trailing dot, sometimes not.
            let whole = first_text(&el, ".a-price-whole").unwrap_or_default();
            let fraction = first_text(&el, ".a-price-fraction").unwrap_or_default();
            let joined = if fraction.is_empty() {
                whole.clone()
            } else {
                format!("{}.{}", whole.trim_end_matches('.'), fraction)
            };
            let Some(price) = parse_price(&joined) else {
                continue;
            };

            let mut listing = RawListing::new(name, price, "Amazon", "amazon");
            if let Some(image) = first_attr(&el, "img.s-image", "src") {
                listing = listing.with_image(image);
            }
            if let Some(href) = first_attr(&el, "h2 a", "href") {
                listing = listing.with_link(absolutize(BASE, &href));
            }
            listings.push(listing);
        }
        listings
    }
}

#[async_trait]
impl StoreFetcher for AmazonFetcher {
    fn meta(&self) -> &StoreMeta {
        &self.meta
    }

    async fn search(&self, query: &str) -> FetchResult<Vec<RawListing>> {
        let url = Self::search_url(query)?;
        let html = self.client.get_html(url.as_str(), BASE).await?;
        let listings = Self::parse_listings(&html);
        debug!(store = "amazon", count = listings.len(), "listings parsed");
        Ok(listings)
    }
}
