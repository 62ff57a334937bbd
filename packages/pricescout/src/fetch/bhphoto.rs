//! B&H Photo search scraper.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::{absolutize, first_attr, first_image, first_text, parse_price, StoreClient, StoreFetcher};
use crate::error::FetchResult;
use crate::types::{RawListing, StoreMeta};

const BASE: &str = "https://www.bhphotovideo.com";
const MAX_LISTINGS: usize = 20;

/// Preferred markup first: B&H tags its cards with data-selenium hooks,
/// which are far more stable than the CSS-module class names.
const CARD_STRATEGIES: &[&str] = &[
    r#"[data-selenium="miniProductPage"]"#,
    ".item-list",
    r#"[class*="product"]"#,
];

const NAME_SELECTORS: &str = r#"[data-selenium="itemTitle"], .item-description, h3, h4"#;
const PRICE_SELECTORS: &str =
    r#"[data-selenium="uppedDecimalPriceFirst"], [class*="price"], .price-box"#;

pub struct BhPhotoFetcher {
    client: StoreClient,
    meta: StoreMeta,
}

impl BhPhotoFetcher {
    pub fn new(client: StoreClient) -> Self {
        Self {
            client,
            meta: StoreMeta::new(
                "B&H Photo",
                "bhphoto",
                BASE,
                "Photo, video and pro audio equipment",
            ),
        }
    }

    fn search_url(query: &str) -> FetchResult<Url> {
        Ok(Url::parse_with_params(
            &format!("{}/c/search", BASE),
            &[("q", query), ("N", "0")],
        )?)
    }

    pub fn parse_listings(html: &str) -> Vec<RawListing> {
        let document = Html::parse_document(html);

        for strategy in CARD_STRATEGIES {
            let Ok(card) = Selector::parse(strategy) else {
                continue;
            };

            let mut listings: Vec<RawListing> = Vec::new();
            for el in document.select(&card) {
                if listings.len() >= MAX_LISTINGS {
                    break;
                }
                let Some(name) = first_text(&el, NAME_SELECTORS) else {
                    continue;
                };
                let Some(price) =
                    first_text(&el, PRICE_SELECTORS).and_then(|t| parse_price(&t))
                else {
                    continue;
                };
                if listings.iter().any(|l| l.name == name) {
                    continue;
                }

                let mut listing = RawListing::new(name, price, "B&H Photo", "bhphoto");
                if let Some(image) = first_image(&el, "img") {
                    listing = listing.with_image(image);
                }
                if let Some(href) = first_attr(&el, "a", "href") {
                    listing = listing.with_link(absolutize(BASE, &href));
                }
                listings.push(listing);
            }

            if !listings.is_empty() {
                return listings;
            }
        }
        Vec::new()
    }
}

#[async_trait]
impl StoreFetcher for BhPhotoFetcher {
    fn meta(&self) -> &StoreMeta {
        &self.meta
    }

    async fn search(&self, query: &str) -> FetchResult<Vec<RawListing>> {
        let url = Self::search_url(query)?;
        let html = self.client.get_html(url.as_str(), BASE).await?;
        let listings = Self::parse_listings(&html);
        debug!(store = "bhphoto", count = listings.len(), "listings parsed");
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
    <html><body>
      <div data-selenium="miniProductPage">
        <a href="/c/product/1785424-REG/apple_mbp.html">
          <span data-selenium="itemTitle">Apple MacBook Pro 16" M3 Max</span>
        </a>
        <span data-selenium="uppedDecimalPriceFirst">$3,499</span>
        <img data-src="https://static.bhphoto.com/mbp.jpg">
      </div>
      <div data-selenium="miniProductPage">
        <span data-selenium="itemTitle">Sony a7 IV Mirrorless Camera</span>
        <span data-selenium="uppedDecimalPriceFirst">$2,498.00</span>
      </div>
    </body></html>
    "#;

    #[test]
    fn parses_selenium_tagged_cards() {
        let listings = BhPhotoFetcher::parse_listings(FIXTURE);
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].name, "Apple MacBook Pro 16\" M3 Max");
        assert_eq!(listings[0].price, 3499.0);
        assert_eq!(
            listings[0].link.as_deref(),
            Some("https://www.bhphotovideo.com/c/product/1785424-REG/apple_mbp.html")
        );
    }

    #[test]
    fn lazy_loaded_image_is_picked_up() {
        let listings = BhPhotoFetcher::parse_listings(FIXTURE);
        assert_eq!(
            listings[0].image.as_deref(),
            Some("https://static.bhphoto.com/mbp.jpg")
        );
    }

    #[test]
    fn search_url_carries_query_and_category() {
        let url = BhPhotoFetcher::search_url("mirrorless camera").unwrap();
        assert!(url.as_str().contains("q=mirrorless+camera"));
        assert!(url.as_str().contains("N=0"));
    }
}
