//! In-memory price history recorder.
//!
//! Search results feed price points in off the request path; the
//! price-history endpoint reads them back filtered by store and day window.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use pricescout::RankedProduct;

pub const DEFAULT_DAYS: i64 = 30;
pub const MAX_DAYS: i64 = 365;

/// One observed price for a product at a store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub date: DateTime<Utc>,
    pub price: f64,
    pub store_slug: String,
}

#[derive(Clone, Default)]
pub struct PriceHistory {
    by_product: Arc<RwLock<HashMap<String, Vec<PricePoint>>>>,
}

impl PriceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every offer of every ranked product at the current time.
    pub fn record(&self, products: &[RankedProduct]) {
        let Ok(mut map) = self.by_product.write() else {
            return;
        };
        let now = Utc::now();
        for ranked in products {
            let points = map.entry(ranked.product.id.clone()).or_default();
            for offer in &ranked.product.prices {
                points.push(PricePoint {
                    date: now,
                    price: offer.price,
                    store_slug: offer.store_slug.clone(),
                });
            }
        }
    }

    /// Price points for a product within the last `days` days, optionally
    /// restricted to one store. `days` is clamped to 1..=365.
    pub fn for_product(
        &self,
        product_id: &str,
        store_slug: Option<&str>,
        days: i64,
    ) -> Vec<PricePoint> {
        let days = days.clamp(1, MAX_DAYS);
        let cutoff = Utc::now() - Duration::days(days);

        self.by_product
            .read()
            .ok()
            .and_then(|map| map.get(product_id).cloned())
            .unwrap_or_default()
            .into_iter()
            .filter(|p| p.date >= cutoff)
            .filter(|p| store_slug.map(|s| p.store_slug == s).unwrap_or(true))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricescout::{
        BestDeal, PriceRange, Product, RankedProduct, Scores, SpecFilters, StorePrice,
    };

    fn ranked(id: &str, offers: Vec<(&str, f64)>) -> RankedProduct {
        let prices: Vec<StorePrice> = offers
            .iter()
            .map(|(slug, price)| StorePrice {
                store: slug.to_string(),
                store_slug: slug.to_string(),
                price: *price,
                original_price: None,
                in_stock: true,
                url: None,
            })
            .collect();
        RankedProduct {
            product: Product {
                id: id.into(),
                name: "Laptop".into(),
                brand: "ASUS".into(),
                category: "laptops".into(),
                image: None,
                description: "Laptop".into(),
                specs: SpecFilters::default(),
                prices: prices.clone(),
            },
            score: Scores {
                relevance: 100,
                value: 0.0,
            },
            price_range: PriceRange {
                min: prices[0].price,
                max: prices[0].price,
                avg: prices[0].price,
            },
            best_deal: BestDeal {
                store: prices[0].store.clone(),
                store_slug: prices[0].store_slug.clone(),
                price: prices[0].price,
                savings: 0.0,
            },
        }
    }

    #[test]
    fn records_every_offer() {
        let history = PriceHistory::new();
        history.record(&[ranked("p1", vec![("newegg", 999.0), ("amazon", 1049.0)])]);

        let points = history.for_product("p1", None, 30);
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn filters_by_store() {
        let history = PriceHistory::new();
        history.record(&[ranked("p1", vec![("newegg", 999.0), ("amazon", 1049.0)])]);

        let points = history.for_product("p1", Some("amazon"), 30);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].price, 1049.0);
    }

    #[test]
    fn unknown_product_yields_empty() {
        let history = PriceHistory::new();
        assert!(history.for_product("nope", None, 30).is_empty());
    }

    #[test]
    fn day_window_is_clamped() {
        let history = PriceHistory::new();
        history.record(&[ranked("p1", vec![("newegg", 999.0)])]);

        // Out-of-range windows behave like their clamped equivalents.
        assert_eq!(history.for_product("p1", None, 0).len(), 1);
        assert_eq!(history.for_product("p1", None, 10_000).len(), 1);
    }
}
