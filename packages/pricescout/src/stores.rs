//! Supported retailer catalog.

use std::sync::OnceLock;

use crate::types::StoreMeta;

/// All retailers the pipeline scrapes, in fan-out order.
pub fn all() -> &'static [StoreMeta] {
    static STORES: OnceLock<Vec<StoreMeta>> = OnceLock::new();
    STORES.get_or_init(|| {
        vec![
            StoreMeta::new(
                "Newegg",
                "newegg",
                "https://www.newegg.com",
                "Computer hardware and consumer electronics",
            ),
            StoreMeta::new(
                "Amazon",
                "amazon",
                "https://www.amazon.com",
                "Everything store",
            ),
            StoreMeta::new(
                "Best Buy",
                "bestbuy",
                "https://www.bestbuy.com",
                "Consumer electronics retailer",
            ),
            StoreMeta::new(
                "B&H Photo",
                "bhphoto",
                "https://www.bhphotovideo.com",
                "Photo, video and pro audio equipment",
            ),
            StoreMeta::new(
                "Micro Center",
                "microcenter",
                "https://www.microcenter.com",
                "PC components and enthusiast hardware",
            ),
            StoreMeta::new(
                "Walmart",
                "walmart",
                "https://www.walmart.com",
                "General retailer with electronics",
            ),
        ]
    })
}

/// Look a retailer up by its slug.
pub fn by_slug(slug: &str) -> Option<&'static StoreMeta> {
    all().iter().find(|s| s.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_six_unique_slugs() {
        let stores = all();
        assert_eq!(stores.len(), 6);

        let mut slugs: Vec<_> = stores.iter().map(|s| s.slug.as_str()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), 6);
    }

    #[test]
    fn lookup_by_slug() {
        assert_eq!(by_slug("bhphoto").map(|s| s.name.as_str()), Some("B&H Photo"));
        assert!(by_slug("sears").is_none());
    }
}
