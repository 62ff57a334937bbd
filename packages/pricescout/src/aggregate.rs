//! Fan-out search and listing-to-product aggregation.
//!
//! One failing store never fails a search: each fetcher's error is logged
//! and replaced with an empty result set before the merge.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::fetch::StoreFetcher;
use crate::types::{Product, RawListing, SearchFilters, SpecFilters, StorePrice};

const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1603302576837-37561b2e2302?w=400";

const KNOWN_BRANDS: &[&str] = &[
    "ASUS", "MSI", "Lenovo", "Dell", "HP", "Acer", "Apple", "Samsung", "LG", "Sony", "Razer",
];

/// Build the text query sent to every store from parsed filters.
///
/// Keywords carry most of the signal; category, brands and the headline
/// specs are appended so stores with weak keyword search still hit.
pub fn build_search_query(filters: &SearchFilters) -> String {
    let mut parts: Vec<&str> = Vec::new();

    parts.extend(filters.keywords.iter().map(String::as_str));
    if let Some(category) = &filters.category {
        parts.push(category);
    }
    if let Some(brand) = &filters.brand {
        parts.extend(brand.iter());
    }
    if let Some(specs) = &filters.specs {
        if let Some(gpu) = &specs.gpu {
            parts.push(gpu);
        }
        if let Some(cpu) = &specs.cpu {
            parts.push(cpu);
        }
    }

    parts.join(" ")
}

/// Search every store concurrently and merge whatever came back.
pub async fn search_all_stores(
    fetchers: &[Arc<dyn StoreFetcher>],
    query: &str,
) -> Vec<RawListing> {
    let started = Instant::now();

    let searches = fetchers.iter().map(|f| {
        let fetcher = Arc::clone(f);
        let query = query.to_string();
        async move {
            match fetcher.search(&query).await {
                Ok(listings) => {
                    info!(
                        store = %fetcher.meta().slug,
                        count = listings.len(),
                        "store search complete"
                    );
                    listings
                }
                Err(e) => {
                    warn!(store = %fetcher.meta().slug, error = %e, "store search failed");
                    Vec::new()
                }
            }
        }
    });

    let all: Vec<RawListing> = join_all(searches).await.into_iter().flatten().collect();
    info!(
        total = all.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scrape fan-out complete"
    );
    all
}

/// Turn raw listings into products, one per listing.
///
/// No cross-store identity is established here: two listings for the same
/// physical item stay two products.
pub fn build_products(listings: Vec<RawListing>, filters: &SearchFilters) -> Vec<Product> {
    listings
        .into_iter()
        .enumerate()
        .map(|(index, listing)| {
            let brand = extract_brand(&listing.name);
            let category = infer_category(&listing.name, filters.category.as_deref());
            let specs = extract_specs(&listing.name);
            let id = format!("web-{}-{}", listing.store_slug, index);
            let image = listing
                .image
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
            let name = listing.name.clone();

            Product {
                id,
                description: name.clone(),
                name,
                brand,
                category,
                image: Some(image),
                specs,
                prices: vec![StorePrice::from(listing)],
            }
        })
        .collect()
}

/// First known brand appearing in the name, else "Unknown".
fn extract_brand(name: &str) -> String {
    let upper = name.to_uppercase();
    KNOWN_BRANDS
        .iter()
        .find(|b| upper.contains(&b.to_uppercase()))
        .map(|b| b.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// A category from the filters wins; otherwise guess from the name.
fn infer_category(name: &str, filter_category: Option<&str>) -> String {
    if let Some(category) = filter_category {
        return category.to_string();
    }

    let lower = name.to_lowercase();
    let pairs: &[(&[&str], &str)] = &[
        (&["laptop", "notebook"], "laptops"),
        (&["phone", "iphone", "galaxy"], "smartphones"),
        (&["monitor", "display"], "monitors"),
        (&["headphone", "earbuds"], "headphones"),
        (&["keyboard"], "keyboards"),
        (&["mouse"], "mice"),
        (&["tablet", "ipad"], "tablets"),
    ];
    for (needles, category) in pairs {
        if needles.iter().any(|n| lower.contains(n)) {
            return category.to_string();
        }
    }
    "electronics".to_string()
}

/// Pull gpu/cpu/ram/storage fragments out of a listing name.
fn extract_specs(name: &str) -> SpecFilters {
    use regex::Regex;
    use std::sync::OnceLock;

    static GPU: OnceLock<Regex> = OnceLock::new();
    static CPU: OnceLock<Regex> = OnceLock::new();
    static RAM: OnceLock<Regex> = OnceLock::new();
    static STORAGE: OnceLock<Regex> = OnceLock::new();

    let gpu = GPU.get_or_init(|| Regex::new(r"(?i)(RTX|GTX|RX)\s*\d{4}").unwrap());
    let cpu =
        CPU.get_or_init(|| Regex::new(r"(?i)(Intel|AMD|Ryzen|Core)\s*(i\d|Ryzen\s*\d)").unwrap());
    let ram = RAM.get_or_init(|| Regex::new(r"(?i)(\d+)\s*GB\s*(RAM|DDR\d)").unwrap());
    let storage = STORAGE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*(GB|TB)\s*(SSD|HDD)").unwrap());

    SpecFilters {
        gpu: gpu.find(name).map(|m| m.as_str().to_string()),
        cpu: cpu.find(name).map(|m| m.as_str().to_string()),
        ram: ram.find(name).map(|m| m.as_str().to_string()),
        storage: storage.find(name).map(|m| m.as_str().to_string()),
    }
}
