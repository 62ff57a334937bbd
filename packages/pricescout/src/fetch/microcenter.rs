//! Micro Center search scraper.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::{absolutize, first_attr, first_image, first_text, parse_price, StoreClient, StoreFetcher};
use crate::error::FetchResult;
use crate::types::{RawListing, StoreMeta};

const BASE: &str = "https://www.microcenter.com";
const MAX_LISTINGS: usize = 20;

const CARD_SELECTORS: &str = r#".product_wrapper, [class*="product"], [id*="product"]"#;
const NAME_SELECTORS: &str = r#"[class*="title"], h2, a[data-name]"#;
const PRICE_SELECTORS: &str = r#"[class*="price"], .price, [id*="price"]"#;

pub struct MicroCenterFetcher {
    client: StoreClient,
    meta: StoreMeta,
}

impl MicroCenterFetcher {
    pub fn new(client: StoreClient) -> Self {
        Self {
            client,
            meta: StoreMeta::new(
                "Micro Center",
                "microcenter",
                BASE,
                "PC components and enthusiast hardware",
            ),
        }
    }

    fn search_url(query: &str) -> FetchResult<Url> {
        Ok(Url::parse_with_params(
            &format!("{}/search/search_results.aspx", BASE),
            &[("Ntt", query)],
        )?)
    }

    /// Micro Center's markup is a soup of `product`-ish classes, so every
    /// candidate node is probed and dedup by name keeps the noise out.
    pub fn parse_listings(html: &str) -> Vec<RawListing> {
        let document = Html::parse_document(html);
        let card = match Selector::parse(CARD_SELECTORS) {
            Ok(s) => s,
            Err(_) => return Vec::new(),
        };

        let mut listings: Vec<RawListing> = Vec::new();
        for el in document.select(&card) {
            if listings.len() >= MAX_LISTINGS {
                break;
            }
            let Some(name) = first_text(&el, NAME_SELECTORS) else {
                continue;
            };
            let Some(price) = first_text(&el, PRICE_SELECTORS).and_then(|t| parse_price(&t))
            else {
                continue;
            };
            if listings.iter().any(|l| l.name == name) {
                continue;
            }

            let mut listing = RawListing::new(name, price, "Micro Center", "microcenter");
            if let Some(image) = first_image(&el, "img") {
                listing = listing.with_image(absolutize(BASE, &image));
            }
            if let Some(href) = first_attr(&el, "a", "href") {
                listing = listing.with_link(absolutize(BASE, &href));
            }
            listings.push(listing);
        }
        listings
    }
}

#[async_trait]
impl StoreFetcher for MicroCenterFetcher {
    fn meta(&self) -> &StoreMeta {
        &self.meta
    }

    async fn search(&self, query: &str) -> FetchResult<Vec<RawListing>> {
        let url = Self::search_url(query)?;
        let html = self.client.get_html(url.as_str(), BASE).await?;
        let listings = Self::parse_listings(&html);
        debug!(store = "microcenter", count = listings.len(), "listings parsed");
        Ok(listings)
    }
}
