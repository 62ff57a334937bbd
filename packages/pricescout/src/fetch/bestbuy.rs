//! Best Buy search scraper.

use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use super::{absolutize, first_image, first_text, parse_price, StoreClient, StoreFetcher};
use crate::error::FetchResult;
use crate::types::{RawListing, StoreMeta};

const BASE: &str = "https://www.bestbuy.com";
const MAX_LISTINGS: usize = 20;

/// Best Buy ships at least three generations of result-card markup
/// depending on the experiment bucket the request lands in.
const CARD_STRATEGIES: &[&str] = &[".sku-item", r#"[class*="ProductCard"]"#, ".list-item"];

const NAME_SELECTORS: &str = r#"h4, .sku-title, [class*="Title"]"#;
const PRICE_SELECTORS: &str =
    r#".priceView-customer-price, .priceView-hero-price, [class*="price"]"#;

pub struct BestBuyFetcher {
    client: StoreClient,
    meta: StoreMeta,
}

impl BestBuyFetcher {
    pub fn new(client: StoreClient) -> Self {
        Self {
            client,
            meta: StoreMeta::new(
                "Best Buy",
                "bestbuy",
                BASE,
                "Consumer electronics retailer",
            ),
        }
    }

    fn search_url(query: &str) -> FetchResult<Url> {
        Ok(Url::parse_with_params(
            &format!("{}/site/searchpage.jsp", BASE),
            &[("st", query)],
        )?)
    }

    /// Extract listings, trying each card strategy in order and keeping
    /// the first that yields anything. Duplicate names are dropped.
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

                let mut listing = RawListing::new(name, price, "Best Buy", "bestbuy");
                if let Some(image) = first_image(&el, "img") {
                    listing = listing.with_image(image);
                }
                if let Some(href) = super::first_attr(&el, "a", "href") {
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
impl StoreFetcher for BestBuyFetcher {
    fn meta(&self) -> &StoreMeta {
        &self.meta
    }

    async fn search(&self, query: &str) -> FetchResult<Vec<RawListing>> {
        let url = Self::search_url(query)?;
        let html = self.client.get_html(url.as_str(), BASE).await?;
        let listings = Self::parse_listings(&html);
        debug!(store = "bestbuy", count = listings.len(), "listings parsed");
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKU_FIXTURE: &str = r#"
    <html><body>
      <li class="sku-item">
        <h4 class="sku-title"><a href="/site/asus-rog/6535928.p">ASUS ROG Zephyrus G14 RTX 4070</a></h4>
        <div class="priceView-customer-price"><span>$1,599.99</span></div>
        <img src="https://pisces.bbystatic.com/g14.jpg">
      </li>
      <li class="sku-item">
        <h4 class="sku-title"><a href="/site/asus-rog/6535928.p">ASUS ROG Zephyrus G14 RTX 4070</a></h4>
        <div class="priceView-customer-price"><span>$1,599.99</span></div>
      </li>
      <li class="sku-item">
        <h4 class="sku-title"><a href="/site/hp-omen/6571234.p">HP Omen 16</a></h4>
        <div class="priceView-hero-price"><span>$1,249.99</span></div>
      </li>
    </body></html>
    "#;

    const CARD_FIXTURE: &str = r#"
    <html><body>
      <div class="ProductCard_root__x1">
        <div class="ProductCard_Title__y2">Sony WH-1000XM5</div>
        <span class="ProductCard_price__z3">$329.99</span>
        <a href="https://www.bestbuy.com/site/sony/6505727.p">view</a>
      </div>
    </body></html>
    "#;

    #[test]
    fn parses_sku_item_markup() {
        let listings = BestBuyFetcher::parse_listings(SKU_FIXTURE);
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].name, "ASUS ROG Zephyrus G14 RTX 4070");
        assert_eq!(listings[0].price, 1599.99);
        assert_eq!(
            listings[0].link.as_deref(),
            Some("https://www.bestbuy.com/site/asus-rog/6535928.p")
        );
    }

    #[test]
    fn deduplicates_by_name() {
        let listings = BestBuyFetcher::parse_listings(SKU_FIXTURE);
        let names: Vec<_> = listings.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["ASUS ROG Zephyrus G14 RTX 4070", "HP Omen 16"]);
    }

    #[test]
    fn falls_through_to_product_card_markup() {
        let listings = BestBuyFetcher::parse_listings(CARD_FIXTURE);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].name, "Sony WH-1000XM5");
        assert_eq!(listings[0].price, 329.99);
    }

    #[test]
    fn empty_page_yields_nothing() {
        assert!(BestBuyFetcher::parse_listings("<html></html>").is_empty());
    }
}
