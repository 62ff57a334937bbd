//! Walmart search scraper.
//!
//! Walmart renders its results client-side, so the primary strategy is to
//! pull the `__NEXT_DATA__` JSON payload out of the page and walk it. The
//! HTML grid is only a fallback for the rare server-rendered variant.

use async_trait::async_trait;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{absolutize, first_attr, first_text, parse_price, StoreClient, StoreFetcher};
use crate::error::FetchResult;
use crate::types::{RawListing, StoreMeta};

const BASE: &str = "https://www.walmart.com";
const MAX_LISTINGS: usize = 20;

pub struct WalmartFetcher {
    client: StoreClient,
    meta: StoreMeta,
}

impl WalmartFetcher {
    pub fn new(client: StoreClient) -> Self {
        Self {
            client,
            meta: StoreMeta::new(
                "Walmart",
                "walmart",
                BASE,
                "General retailer with electronics",
            ),
        }
    }

    fn search_url(query: &str) -> FetchResult<Url> {
        Ok(Url::parse_with_params(
            &format!("{}/search", BASE),
            &[("q", query)],
        )?)
    }

    pub fn parse_listings(html: &str) -> Vec<RawListing> {
        let document = Html::parse_document(html);

        let listings = Self::listings_from_embedded_json(&document);
        if !listings.is_empty() {
            return listings;
        }
        Self::listings_from_grid(&document)
    }

    fn listings_from_embedded_json(document: &Html) -> Vec<RawListing> {
        let Ok(script) =
            Selector::parse(r#"script[type="application/json"], script[id*="__NEXT_DATA__"]"#)
        else {
            return Vec::new();
        };

        let mut listings = Vec::new();
        for el in document.select(&script) {
            let content: String = el.text().collect();
            if !content.contains("itemStacks")
                && !content.contains("searchContent")
                && !content.contains("products")
            {
                continue;
            }
            let Ok(json) = serde_json::from_str::<Value>(&content) else {
                continue;
            };

            // The payload shape has shifted between app releases.
            let items = json
                .pointer("/props/pageProps/initialData/searchResult/itemStacks/0/items")
                .or_else(|| json.pointer("/props/initialData/searchContent/products"))
                .and_then(Value::as_array);
            let Some(items) = items else {
                continue;
            };

            for item in items.iter().take(MAX_LISTINGS) {
                let product = item.get("product").unwrap_or(item);
                if let Some(listing) = Self::listing_from_product(product) {
                    if listings.iter().any(|l: &RawListing| l.name == listing.name) {
                        continue;
                    }
                    listings.push(listing);
                }
            }
            if !listings.is_empty() {
                break;
            }
        }
        listings
    }

    fn listing_from_product(product: &Value) -> Option<RawListing> {
        let name = product
            .get("name")
            .or_else(|| product.get("title"))
            .and_then(Value::as_str)?;

        let price_info = product
            .pointer("/priceInfo/currentPrice")
            .or_else(|| product.get("price"))?;
        let price = price_info
            .get("price")
            .unwrap_or(price_info)
            .as_f64()
            .filter(|p| *p > 0.0)?;

        let in_stock = product
            .get("availabilityStatus")
            .and_then(Value::as_str)
            .map(|s| s != "OUT_OF_STOCK")
            .unwrap_or(true);

        let mut listing =
            RawListing::new(name, price, "Walmart", "walmart").with_stock(in_stock);
        if let Some(image) = product
            .pointer("/imageInfo/thumbnailUrl")
            .or_else(|| product.get("image"))
            .and_then(Value::as_str)
        {
            listing = listing.with_image(image);
        }
        if let Some(path) = product
            .get("canonicalUrl")
            .or_else(|| product.get("url"))
            .and_then(Value::as_str)
        {
            listing = listing.with_link(absolutize(BASE, path));
        }
        Some(listing)
    }

    fn listings_from_grid(document: &Html) -> Vec<RawListing> {
        let Ok(card) = Selector::parse(r#"[class*="search-result"], [data-item-id]"#) else {
            return Vec::new();
        };

        let mut listings: Vec<RawListing> = Vec::new();
        for el in document.select(&card).take(MAX_LISTINGS) {
            let Some(name) = first_text(&el, r#"[class*="product-title"], [class*="Title"]"#)
            else {
                continue;
            };
            if listings.iter().any(|l| l.name == name) {
                continue;
            }
            let Some(price) =
                first_text(&el, r#"[class*="price"]"#).and_then(|t| parse_price(&t))
            else {
                continue;
            };

            let mut listing = RawListing::new(name, price, "Walmart", "walmart");
            if let Some(image) = first_attr(&el, "img", "src") {
                listing = listing.with_image(image);
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
impl StoreFetcher for WalmartFetcher {
    fn meta(&self) -> &StoreMeta {
        &self.meta
    }

    async fn search(&self, query: &str) -> FetchResult<Vec<RawListing>> {
        let url = Self::search_url(query)?;
        let html = self.client.get_html(url.as_str(), BASE).await?;
        let listings = Self::parse_listings(&html);
        debug!(store = "walmart", count = listings.len(), "listings parsed");
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_FIXTURE: &str = r#"
    <html><body>
      <script id="__NEXT_DATA__" type="application/json">
      {"props":{"pageProps":{"initialData":{"searchResult":{"itemStacks":[{"items":[
        {"name":"HP Victus 15 Gaming Laptop RTX 4060",
         "priceInfo":{"currentPrice":{"price":799.0}},
         "imageInfo":{"thumbnailUrl":"https://i5.walmartimages.com/victus.jpg"},
         "canonicalUrl":"/ip/hp-victus/5034592145",
         "availabilityStatus":"IN_STOCK"},
        {"name":"Acer Nitro V OUT",
         "priceInfo":{"currentPrice":{"price":649.99}},
         "canonicalUrl":"/ip/acer-nitro/5034592199",
         "availabilityStatus":"OUT_OF_STOCK"},
        {"name":"No price product"}
      ]}]}}}}}
      </script>
    </body></html>
    "#;

    const GRID_FIXTURE: &str = r#"
    <html><body>
      <div class="search-result-gridview-item">
        <span class="product-title-link">Samsung 49" Odyssey G9</span>
        <span class="price-main">$899.00</span>
        <a href="/ip/samsung-g9/577349"></a>
      </div>
    </body></html>
    "#;

    #[test]
    fn extracts_from_next_data_json() {
        let listings = WalmartFetcher::parse_listings(JSON_FIXTURE);
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].name, "HP Victus 15 Gaming Laptop RTX 4060");
        assert_eq!(listings[0].price, 799.0);
        assert!(listings[0].in_stock);
        assert_eq!(
            listings[0].link.as_deref(),
            Some("https://www.walmart.com/ip/hp-victus/5034592145")
        );
    }

    #[test]
    fn honors_out_of_stock_status() {
        let listings = WalmartFetcher::parse_listings(JSON_FIXTURE);
        assert!(!listings[1].in_stock);
    }

    #[test]
    fn deduplicates_by_name() {
        let html = r#"
        <html><body>
          <script id="__NEXT_DATA__" type="application/json">
          {"props":{"pageProps":{"initialData":{"searchResult":{"itemStacks":[{"items":[
            {"name":"HP Victus 15","priceInfo":{"currentPrice":{"price":799.0}}},
            {"name":"HP Victus 15","priceInfo":{"currentPrice":{"price":749.0}}}
          ]}]}}}}}
          </script>
        </body></html>
        "#;
        let listings = WalmartFetcher::parse_listings(html);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].price, 799.0);
    }

    #[test]
    fn absolute_links_are_left_alone() {
        let html = r#"
        <html><body>
          <script id="__NEXT_DATA__" type="application/json">
          {"props":{"pageProps":{"initialData":{"searchResult":{"itemStacks":[{"items":[
            {"name":"HP Victus 15",
             "priceInfo":{"currentPrice":{"price":799.0}},
             "canonicalUrl":"https://www.walmart.com/ip/hp-victus/5034592145"}
          ]}]}}}}}
          </script>
        </body></html>
        "#;
        let listings = WalmartFetcher::parse_listings(html);
        assert_eq!(
            listings[0].link.as_deref(),
            Some("https://www.walmart.com/ip/hp-victus/5034592145")
        );
    }

    #[test]
    fn falls_back_to_grid_markup() {
        let listings = WalmartFetcher::parse_listings(GRID_FIXTURE);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].name, "Samsung 49\" Odyssey G9");
        assert_eq!(listings[0].price, 899.0);
        assert_eq!(
            listings[0].link.as_deref(),
            Some("https://www.walmart.com/ip/samsung-g9/577349")
        );
    }
}
