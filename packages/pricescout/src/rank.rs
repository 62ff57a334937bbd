//! Relevance and value scoring for aggregated products.

use crate::types::{BestDeal, PriceRange, Product, RankedProduct, Scores, SearchFilters};

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Weighted relevance of a product against the parsed filters.
///
/// Base 100, plus: category match 50, brand match 30, spec match ratio x40,
/// keyword match ratio x20, price competitiveness vs max_price (20 under
/// 0.7x, 10 under 0.9x), 5 per in-stock offer, 3 per store carrying it.
fn relevance_score(product: &Product, filters: &SearchFilters) -> i64 {
    let mut score = 100.0;

    if let Some(category) = &filters.category {
        if product.category == *category {
            score += 50.0;
        }
    }

    if let Some(brand) = &filters.brand {
        if brand.matches(&product.brand) {
            score += 30.0;
        }
    }

    if let Some(specs) = &filters.specs {
        let wanted = specs.entries();
        if !wanted.is_empty() {
            let have = product.specs.entries();
            let matches = wanted
                .iter()
                .filter(|(key, value)| {
                    have.iter().any(|(k, v)| {
                        k == key && v.to_lowercase().contains(&value.to_lowercase())
                    })
                })
                .count();
            score += matches as f64 / wanted.len() as f64 * 40.0;
        }
    }

    if !filters.keywords.is_empty() {
        let mut haystack = format!("{} {}", product.name, product.description);
        for (_, value) in product.specs.entries() {
            haystack.push(' ');
            haystack.push_str(value);
        }
        let haystack = haystack.to_lowercase();
        let matched = filters
            .keywords
            .iter()
            .filter(|kw| haystack.contains(&kw.to_lowercase()))
            .count();
        score += matched as f64 / filters.keywords.len() as f64 * 20.0;
    }

    if let (Some(max_price), Some(min)) = (filters.max_price, min_offer_price(product)) {
        if max_price > 0.0 {
            let ratio = min / max_price;
            if ratio <= 0.7 {
                score += 20.0;
            } else if ratio <= 0.9 {
                score += 10.0;
            }
        }
    }

    let in_stock = product.prices.iter().filter(|p| p.in_stock).count();
    score += in_stock as f64 * 5.0;
    score += product.prices.len() as f64 * 3.0;

    score.round() as i64
}

/// Crude performance-per-dollar heuristic.
fn value_score(product: &Product) -> f64 {
    let Some(min) = min_offer_price(product) else {
        return 0.0;
    };

    let mut performance = 0.0;

    if let Some(gpu) = &product.specs.gpu {
        const GPU_TIERS: &[(&str, f64)] = &[
            ("5090", 120.0),
            ("5080", 105.0),
            ("4090", 100.0),
            ("4080", 90.0),
            ("4070", 80.0),
            ("4060", 70.0),
        ];
        if let Some((_, points)) = GPU_TIERS.iter().find(|(model, _)| gpu.contains(model)) {
            performance += points;
        }
    }

    if let Some(ram) = &product.specs.ram {
        let digits: String = ram.chars().take_while(|c| c.is_ascii_digit()).collect();
        if let Ok(gb) = digits.parse::<f64>() {
            performance += gb;
        }
    }

    if let Some(storage) = &product.specs.storage {
        if storage.contains("2TB") {
            performance += 20.0;
        } else if storage.contains("1TB") {
            performance += 10.0;
        }
    }

    round2(performance / (min / 1000.0))
}

fn min_offer_price(product: &Product) -> Option<f64> {
    product
        .prices
        .iter()
        .map(|p| p.price)
        .min_by(|a, b| a.total_cmp(b))
}

fn price_range(product: &Product) -> PriceRange {
    let min = min_offer_price(product).unwrap_or(0.0);
    let max = product
        .prices
        .iter()
        .map(|p| p.price)
        .max_by(|a, b| a.total_cmp(b))
        .unwrap_or(0.0);
    let avg = if product.prices.is_empty() {
        0.0
    } else {
        product.prices.iter().map(|p| p.price).sum::<f64>() / product.prices.len() as f64
    };
    PriceRange {
        min: round2(min),
        max: round2(max),
        avg: round2(avg),
    }
}

/// Cheapest in-stock offer; only when nothing is in stock does an
/// out-of-stock offer qualify.
fn best_deal(product: &Product) -> Option<BestDeal> {
    let pick = product
        .prices
        .iter()
        .filter(|p| p.in_stock)
        .min_by(|a, b| a.price.total_cmp(&b.price))
        .or_else(|| {
            product
                .prices
                .iter()
                .min_by(|a, b| a.price.total_cmp(&b.price))
        })?;

    let savings = pick
        .original_price
        .map(|original| round2(original - pick.price))
        .filter(|s| *s > 0.0)
        .unwrap_or(0.0);

    Some(BestDeal {
        store: pick.store.clone(),
        store_slug: pick.store_slug.clone(),
        price: pick.price,
        savings,
    })
}

/// Score every product and sort by descending relevance.
///
/// The sort is stable: products with equal scores keep their input order.
/// Products with no offers at all are dropped.
pub fn rank_products(products: Vec<Product>, filters: &SearchFilters) -> Vec<RankedProduct> {
    let mut ranked: Vec<RankedProduct> = products
        .into_iter()
        .filter_map(|product| {
            let deal = best_deal(&product)?;
            let score = Scores {
                relevance: relevance_score(&product, filters),
                value: value_score(&product),
            };
            let range = price_range(&product);
            Some(RankedProduct {
                product,
                score,
                price_range: range,
                best_deal: deal,
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.score.relevance.cmp(&a.score.relevance));
    ranked
}

/// Client-selectable sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Relevance,
    PriceLow,
    PriceHigh,
    Value,
    Stores,
}

impl SortKey {
    /// Parse a query-string value; anything unrecognized means relevance.
    pub fn from_param(param: &str) -> Self {
        match param {
            "price-low" => SortKey::PriceLow,
            "price-high" => SortKey::PriceHigh,
            "value" => SortKey::Value,
            "stores" => SortKey::Stores,
            _ => SortKey::Relevance,
        }
    }
}

/// Re-sort already ranked products by the requested key.
pub fn sort_products(mut products: Vec<RankedProduct>, key: SortKey) -> Vec<RankedProduct> {
    match key {
        SortKey::Relevance => {
            products.sort_by(|a, b| b.score.relevance.cmp(&a.score.relevance));
        }
        SortKey::PriceLow => {
            products.sort_by(|a, b| a.price_range.min.total_cmp(&b.price_range.min));
        }
        SortKey::PriceHigh => {
            products.sort_by(|a, b| b.price_range.min.total_cmp(&a.price_range.min));
        }
        SortKey::Value => {
            products.sort_by(|a, b| b.score.value.total_cmp(&a.score.value));
        }
        SortKey::Stores => {
            products.sort_by(|a, b| b.product.prices.len().cmp(&a.product.prices.len()));
        }
    }
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BrandFilter, SpecFilters, StorePrice};

    fn offer(store: &str, price: f64, in_stock: bool) -> StorePrice {
        StorePrice {
            store: store.to_string(),
            store_slug: store.to_lowercase().replace(' ', ""),
            price,
            original_price: None,
            in_stock,
            url: None,
        }
    }

    fn product(name: &str, prices: Vec<StorePrice>) -> Product {
        Product {
            id: "web-test-0".into(),
            name: name.into(),
            brand: "ASUS".into(),
            category: "laptops".into(),
            image: None,
            description: name.into(),
            specs: SpecFilters::default(),
            prices,
        }
    }

    #[test]
    fn relevance_rewards_category_brand_and_stock() {
        let p = product(
            "ASUS gaming laptop",
            vec![offer("Newegg", 1000.0, true), offer("Amazon", 1100.0, true)],
        );
        let filters = SearchFilters {
            category: Some("laptops".into()),
            brand: Some(BrandFilter::One("asus".into())),
            ..Default::default()
        };

        // 100 base + 50 category + 30 brand + 2x5 stock + 2x3 stores
        assert_eq!(relevance_score(&p, &filters), 196);
    }

    #[test]
    fn relevance_price_competitiveness_tiers() {
        let cheap = product("laptop", vec![offer("Newegg", 600.0, true)]);
        let mid = product("laptop", vec![offer("Newegg", 850.0, true)]);
        let near = product("laptop", vec![offer("Newegg", 999.0, true)]);
        let filters = SearchFilters {
            max_price: Some(1000.0),
            ..Default::default()
        };

        let base = 100 + 5 + 3;
        assert_eq!(relevance_score(&cheap, &filters), base + 20);
        assert_eq!(relevance_score(&mid, &filters), base + 10);
        assert_eq!(relevance_score(&near, &filters), base);
    }

    #[test]
    fn value_score_uses_gpu_tier_ram_and_storage() {
        let mut p = product("rig", vec![offer("Newegg", 2000.0, true)]);
        p.specs = SpecFilters {
            gpu: Some("RTX 4090".into()),
            ram: Some("32GB DDR5".into()),
            storage: Some("2TB SSD".into()),
            ..Default::default()
        };

        // (100 + 32 + 20) / (2000 / 1000)
        assert_eq!(value_score(&p), 76.0);
    }

    #[test]
    fn newer_gpu_generation_outranks_older_at_same_price() {
        let mut a = product("rig", vec![offer("Newegg", 2000.0, true)]);
        a.specs.gpu = Some("RTX 5090".into());
        let mut b = product("rig", vec![offer("Newegg", 2000.0, true)]);
        b.specs.gpu = Some("RTX 4090".into());
        assert!(value_score(&a) > value_score(&b));
    }

    #[test]
    fn best_deal_prefers_in_stock_over_cheaper_out_of_stock() {
        let p = product(
            "laptop",
            vec![
                offer("Newegg", 899.0, false),
                offer("Amazon", 949.0, true),
                offer("Walmart", 999.0, true),
            ],
        );
        let deal = best_deal(&p).unwrap();
        assert_eq!(deal.store, "Amazon");
        assert_eq!(deal.price, 949.0);
    }

    #[test]
    fn best_deal_falls_back_when_nothing_in_stock() {
        let p = product(
            "laptop",
            vec![offer("Newegg", 899.0, false), offer("Amazon", 949.0, false)],
        );
        let deal = best_deal(&p).unwrap();
        assert_eq!(deal.store, "Newegg");
    }

    #[test]
    fn savings_only_from_real_original_price() {
        let mut p = product("laptop", vec![offer("Newegg", 900.0, true)]);
        p.prices[0].original_price = Some(1000.0);
        assert_eq!(best_deal(&p).unwrap().savings, 100.0);

        let q = product("laptop", vec![offer("Newegg", 900.0, true)]);
        assert_eq!(best_deal(&q).unwrap().savings, 0.0);
    }

    #[test]
    fn price_range_spans_all_offers() {
        let p = product(
            "laptop",
            vec![
                offer("Newegg", 899.0, false),
                offer("Amazon", 1099.0, true),
            ],
        );
        let range = price_range(&p);
        assert_eq!(range.min, 899.0);
        assert_eq!(range.max, 1099.0);
        assert_eq!(range.avg, 999.0);
        assert!(range.min <= range.max);
    }

    #[test]
    fn ranking_sort_is_stable_for_equal_scores() {
        let products = vec![
            product("first laptop", vec![offer("Newegg", 100.0, true)]),
            product("second laptop", vec![offer("Amazon", 100.0, true)]),
            product("third laptop", vec![offer("Walmart", 100.0, true)]),
        ];
        let ranked = rank_products(products, &SearchFilters::default());

        let names: Vec<_> = ranked.iter().map(|r| r.product.name.as_str()).collect();
        assert_eq!(names, vec!["first laptop", "second laptop", "third laptop"]);
    }

    #[test]
    fn offerless_products_are_dropped() {
        let products = vec![product("ghost", vec![])];
        assert!(rank_products(products, &SearchFilters::default()).is_empty());
    }

    #[test]
    fn sort_products_by_price_and_stores() {
        let products = vec![
            product("pricey", vec![offer("Newegg", 2000.0, true)]),
            product(
                "cheap everywhere",
                vec![offer("Amazon", 500.0, true), offer("Walmart", 520.0, true)],
            ),
        ];
        let ranked = rank_products(products, &SearchFilters::default());

        let by_price = sort_products(ranked.clone(), SortKey::from_param("price-low"));
        assert_eq!(by_price[0].product.name, "cheap everywhere");

        let by_stores = sort_products(ranked, SortKey::Stores);
        assert_eq!(by_stores[0].product.prices.len(), 2);
    }
}
