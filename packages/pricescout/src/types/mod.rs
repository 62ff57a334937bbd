//! Wire-facing data types for the search pipeline.

pub mod filter;
pub mod listing;
pub mod product;

pub use filter::{BrandFilter, SearchFilters, SpecFilters};
pub use listing::{RawListing, StoreMeta};
pub use product::{BestDeal, PriceRange, Product, RankedProduct, Scores, StorePrice};
