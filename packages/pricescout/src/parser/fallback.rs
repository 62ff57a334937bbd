//! Deterministic regex/keyword query parser.
//!
//! Used when no AI API is configured, or when an AI call fails. Always
//! succeeds: the worst case is a keywords-only filter.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::{BrandFilter, SearchFilters, SpecFilters};

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("laptops", &["laptop", "notebook", "portable computer"]),
    (
        "smartphones",
        &["smartphone", "phone", "mobile", "iphone", "android"],
    ),
    ("monitors", &["monitor", "display", "screen"]),
    (
        "headphones",
        &["headphones", "headset", "earbuds", "earphones"],
    ),
    ("keyboards", &["keyboard", "mechanical keyboard"]),
    ("mice", &["mouse", "gaming mouse"]),
    ("tablets", &["tablet", "ipad"]),
    ("smartwatches", &["smartwatch", "smart watch", "watch"]),
    ("cameras", &["camera", "dslr", "mirrorless"]),
];

const KNOWN_BRANDS: &[&str] = &[
    "apple", "samsung", "dell", "hp", "lenovo", "asus", "msi", "acer", "sony", "lg", "microsoft",
    "google", "nvidia", "amd", "intel",
];

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "with", "for", "under", "above", "below",
];

fn max_price_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:under|below|less than)\s+\$?(\d+(?:,\d{3})*(?:\.\d{2})?)").unwrap()
    })
}

fn min_price_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:above|over)\s+\$?(\d+(?:,\d{3})*(?:\.\d{2})?)").unwrap())
}

fn gpu_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:rtx|gtx|rx)\s*\d{4}").unwrap())
}

fn ram_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*gb\s*(?:ram|memory)").unwrap())
}

fn storage_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+)\s*(gb|tb)\s*(?:ssd|storage|hard drive)").unwrap())
}

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+$").unwrap())
}

/// Parse a price capture like "3,000" or "2999.99".
fn parse_amount(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse().ok()
}

/// Parse a free-text query into structured filters using heuristics only.
pub fn parse(query: &str) -> SearchFilters {
    let lower = query.to_lowercase();
    let mut filters = SearchFilters::default();

    if let Some(cap) = max_price_re().captures(&lower) {
        filters.max_price = parse_amount(&cap[1]);
    }
    if let Some(cap) = min_price_re().captures(&lower) {
        filters.min_price = parse_amount(&cap[1]);
    }

    filters.category = CATEGORY_KEYWORDS
        .iter()
        .find(|(_, kws)| kws.iter().any(|kw| lower.contains(kw)))
        .map(|(cat, _)| cat.to_string());

    let brands: Vec<String> = KNOWN_BRANDS
        .iter()
        .filter(|b| lower.contains(*b))
        .map(|b| b.to_string())
        .collect();
    if !brands.is_empty() {
        filters.brand = Some(BrandFilter::Many(brands));
    }

    let mut specs = SpecFilters::default();
    if let Some(m) = gpu_re().find(&lower) {
        specs.gpu = Some(m.as_str().to_uppercase());
    }
    if let Some(cap) = ram_re().captures(&lower) {
        specs.ram = Some(format!("{}GB", &cap[1]));
    }
    if let Some(cap) = storage_re().captures(&lower) {
        specs.storage = Some(format!("{}{}", &cap[1], cap[2].to_uppercase()));
    }
    if !specs.is_empty() {
        filters.specs = Some(specs);
    }

    let mut features = Vec::new();
    if lower.contains("gaming") {
        features.push("gaming".to_string());
    }
    if lower.contains("wireless") {
        features.push("wireless".to_string());
    }
    if lower.contains("noise cancel") {
        features.push("noise cancellation".to_string());
    }
    if lower.contains("rgb") {
        features.push("RGB".to_string());
    }
    if lower.contains("mechanical") {
        features.push("mechanical".to_string());
    }
    if lower.contains("4k") || lower.contains("uhd") {
        features.push("4K".to_string());
    }
    filters.features = features;

    filters.keywords = lower
        .split_whitespace()
        .filter(|w| w.len() > 2 && !STOP_WORDS.contains(w) && !digits_re().is_match(w))
        .map(|w| w.to_string())
        .collect();

    filters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_max_price_from_under() {
        let filters = parse("gaming laptops under $3000");
        assert_eq!(filters.max_price, Some(3000.0));
    }

    #[test]
    fn extracts_max_price_with_commas() {
        let filters = parse("workstations below $2,500");
        assert_eq!(filters.max_price, Some(2500.0));
    }

    #[test]
    fn extracts_min_price_from_over() {
        let filters = parse("monitors over $400");
        assert_eq!(filters.min_price, Some(400.0));
    }

    #[test]
    fn extracts_gpu_case_normalized() {
        let filters = parse("laptops with rtx 4080");
        assert_eq!(
            filters.specs.unwrap().gpu.as_deref(),
            Some("RTX 4080")
        );
    }

    #[test]
    fn extracts_ram_and_storage() {
        let filters = parse("laptop with 32gb ram and 1tb ssd");
        let specs = filters.specs.unwrap();
        assert_eq!(specs.ram.as_deref(), Some("32GB"));
        assert_eq!(specs.storage.as_deref(), Some("1TB"));
    }

    #[test]
    fn detects_category_and_brands() {
        let filters = parse("asus or msi gaming laptops");
        assert_eq!(filters.category.as_deref(), Some("laptops"));
        let brand = filters.brand.unwrap();
        let brands: Vec<&str> = brand.iter().collect();
        assert_eq!(brands, vec!["asus", "msi"]);
    }

    #[test]
    fn detects_features() {
        let filters = parse("wireless headphones with noise cancellation");
        assert!(filters.features.contains(&"wireless".to_string()));
        assert!(filters.features.contains(&"noise cancellation".to_string()));
    }

    #[test]
    fn keywords_skip_stop_words_and_numbers() {
        let filters = parse("the best laptop for 3000");
        assert!(filters.keywords.contains(&"best".to_string()));
        assert!(filters.keywords.contains(&"laptop".to_string()));
        assert!(!filters.keywords.contains(&"the".to_string()));
        assert!(!filters.keywords.contains(&"for".to_string()));
        assert!(!filters.keywords.contains(&"3000".to_string()));
    }

    #[test]
    fn spec_example_query_parses_fully() {
        let filters = parse("gaming laptops with RTX 5090 under $3000");
        assert_eq!(filters.category.as_deref(), Some("laptops"));
        assert_eq!(filters.max_price, Some(3000.0));
        assert_eq!(
            filters.specs.unwrap().gpu.as_deref(),
            Some("RTX 5090")
        );
        assert!(filters.features.contains(&"gaming".to_string()));
    }
}
