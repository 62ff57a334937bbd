//! Newegg search scraper.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::{first_image, first_text, parse_price, StoreClient, StoreFetcher};
use crate::error::FetchResult;
use crate::types::{RawListing, StoreMeta};

const BASE: &str = "https://www.newegg.com";
const MAX_LISTINGS: usize = 30;

pub struct NeweggFetcher {
    client: StoreClient,
    meta: StoreMeta,
}

impl NeweggFetcher {
    pub fn new(client: StoreClient) -> Self {
        Self {
            client,
            meta: StoreMeta::new(
                "Newegg",
                "newegg",
                BASE,
                "Computer hardware and consumer electronics",
            ),
        }
    }

    fn search_url(query: &str) -> FetchResult<Url> {
        let url = Url::parse_with_params(
            &format!("{}/p/pl", BASE),
            &[("d", query), ("N", "4131")],
        )?;
        Ok(url)
    }

    /// Extract listings from a Newegg search results page.
    pub fn parse_listings(html: &str) -> Vec<RawListing> {
        let document = Html::parse_document(html);
        let cell = match Selector::parse(".item-cell") {
            Ok(s) => s,
            Err(_) => return Vec::new(),
        };

        let mut listings: Vec<RawListing> = Vec::new();
        for el in document.select(&cell).take(MAX_LISTINGS) {
            let Some(name) = first_text(&el, ".item-title") else {
                continue;
            };
            if listings.iter().any(|l| l.name == name) {
                continue;
            }

            // Newegg splits the price into dollars (strong) and cents (sup).
            let dollars = first_text(&el, ".price-current strong").unwrap_or_default();
            let cents = first_text(&el, ".price-current sup").unwrap_or_default();
            let Some(price) = parse_price(&format!("{}{}", dollars, cents)) else {
                continue;
            };

            let cell_text: String = el.text().collect();
            let in_stock = !cell_text.contains("OUT OF STOCK");

            let mut listing =
                RawListing::new(name, price, "Newegg", "newegg").with_stock(in_stock);
            if let Some(image) = first_image(&el, ".item-img img") {
                listing = listing.with_image(image);
            }
            if let Some(link) = super::first_attr(&el, ".item-title", "href") {
                listing = listing.with_link(link);
            }
            listings.push(listing);
        }
        listings
    }
}

#[async_trait]
impl StoreFetcher for NeweggFetcher {
    fn meta(&self) -> &StoreMeta {
        &self.meta
    }

    async fn search(&self, query: &str) -> FetchResult<Vec<RawListing>> {
        let url = Self::search_url(query)?;
        let html = self.client.get_html(url.as_str(), BASE).await?;
        let listings = Self::parse_listings(&html);
        debug!(store = "newegg", count = listings.len(), "listings parsed");
        Ok(listings)
    }
}
