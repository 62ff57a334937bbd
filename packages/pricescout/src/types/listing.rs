//! Raw store listings and retailer metadata.

use serde::{Deserialize, Serialize};

/// One store's offer for a product, exactly as scraped.
///
/// Ephemeral: produced by a single fetcher and not persisted beyond the
/// request/response cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawListing {
    pub name: String,
    pub price: f64,
    pub store: String,
    pub store_slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub in_stock: bool,
}

impl RawListing {
    /// Create a listing with the minimum required fields.
    pub fn new(
        name: impl Into<String>,
        price: f64,
        store: impl Into<String>,
        store_slug: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            price,
            store: store.into(),
            store_slug: store_slug.into(),
            image: None,
            link: None,
            in_stock: true,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    /// A listing is usable when it has a name and a positive price.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && self.price > 0.0
    }
}

/// Static metadata about a supported retailer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMeta {
    pub name: String,
    pub slug: String,
    pub url: String,
    pub description: String,
}

impl StoreMeta {
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            url: url.into(),
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_builder() {
        let listing = RawListing::new("ASUS ROG Strix", 1999.99, "Newegg", "newegg")
            .with_link("https://www.newegg.com/p/1")
            .with_stock(false);

        assert_eq!(listing.store_slug, "newegg");
        assert!(!listing.in_stock);
        assert!(listing.is_valid());
    }

    #[test]
    fn listing_validity() {
        assert!(!RawListing::new("", 100.0, "Amazon", "amazon").is_valid());
        assert!(!RawListing::new("Thing", 0.0, "Amazon", "amazon").is_valid());
        assert!(!RawListing::new("Thing", -5.0, "Amazon", "amazon").is_valid());
    }

    #[test]
    fn listing_serializes_camel_case() {
        let listing = RawListing::new("Laptop", 999.0, "Best Buy", "bestbuy");
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["storeSlug"], "bestbuy");
        assert_eq!(json["inStock"], true);
    }
}
