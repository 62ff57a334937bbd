//! Aggregated products and ranked search results.

use serde::{Deserialize, Serialize};

use super::filter::SpecFilters;
use super::listing::RawListing;

/// One store's offer attached to an aggregated product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorePrice {
    pub store: String,
    pub store_slug: String,
    pub price: f64,
    /// Pre-discount price when the store exposes one. Never synthesized.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    pub in_stock: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<RawListing> for StorePrice {
    fn from(listing: RawListing) -> Self {
        Self {
            store: listing.store,
            store_slug: listing.store_slug,
            price: listing.price,
            original_price: None,
            in_stock: listing.in_stock,
            url: listing.link,
        }
    }
}

/// A grouping of listings presumed (not verified) to represent the same item.
///
/// Listings are not canonicalized across stores: two products may well be the
/// same physical item under different names. SKU/UPC reconciliation is an
/// open problem this pipeline does not attempt to solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub description: String,
    pub specs: SpecFilters,
    pub prices: Vec<StorePrice>,
}

/// Relevance and value scores attached by the ranker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub relevance: i64,
    pub value: f64,
}

/// Min/max/average across a product's offers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

/// The cheapest usable offer for a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestDeal {
    pub store: String,
    pub store_slug: String,
    pub price: f64,
    pub savings: f64,
}

/// A product with ranking output attached. Read-only API shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedProduct {
    #[serde(flatten)]
    pub product: Product,
    #[serde(rename = "_score")]
    pub score: Scores,
    pub price_range: PriceRange,
    pub best_deal: BestDeal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_price_from_listing() {
        let listing = RawListing::new("Laptop", 1200.0, "Walmart", "walmart")
            .with_link("https://walmart.com/ip/1")
            .with_stock(false);
        let price = StorePrice::from(listing);

        assert_eq!(price.store_slug, "walmart");
        assert_eq!(price.price, 1200.0);
        assert!(price.original_price.is_none());
        assert!(!price.in_stock);
        assert_eq!(price.url.as_deref(), Some("https://walmart.com/ip/1"));
    }

    #[test]
    fn ranked_product_flattens_score_key() {
        let product = Product {
            id: "web-amazon-0".into(),
            name: "Laptop".into(),
            brand: "ASUS".into(),
            category: "laptops".into(),
            image: None,
            description: "Laptop".into(),
            specs: SpecFilters::default(),
            prices: vec![],
        };
        let ranked = RankedProduct {
            product,
            score: Scores {
                relevance: 150,
                value: 42.5,
            },
            price_range: PriceRange {
                min: 1.0,
                max: 2.0,
                avg: 1.5,
            },
            best_deal: BestDeal {
                store: "Amazon".into(),
                store_slug: "amazon".into(),
                price: 1.0,
                savings: 0.0,
            },
        };

        let json = serde_json::to_value(&ranked).unwrap();
        assert_eq!(json["_score"]["relevance"], 150);
        assert_eq!(json["priceRange"]["min"], 1.0);
        assert_eq!(json["bestDeal"]["storeSlug"], "amazon");
        // Product fields flattened to the top level
        assert_eq!(json["id"], "web-amazon-0");
    }
}
