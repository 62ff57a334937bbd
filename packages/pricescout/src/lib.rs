//! Multi-Store Price Search Library
//!
//! Turns a natural-language shopping query into ranked, price-compared
//! products scraped live from six retailers.
//!
//! # Pipeline
//!
//! 1. **Parse**: [`parser`] converts free text into [`SearchFilters`],
//!    via an AI parser when configured, with a deterministic regex
//!    fallback that can never fail.
//! 2. **Fetch**: [`fetch`] fans the query out to all store scrapers
//!    concurrently; each failure is isolated to its store.
//! 3. **Aggregate**: [`aggregate`] merges raw listings into products
//!    with extracted brand, category and specs.
//! 4. **Rank**: [`rank`] scores products for relevance and value and
//!    sorts them.
//!
//! ```rust,ignore
//! use pricescout::{aggregate, fetch, parser, rank};
//!
//! let stack = parser::ParserStack::fallback_only();
//! let fetchers = fetch::default_fetchers(fetch::StoreClient::new());
//!
//! let filters = stack.parse("gaming laptops with RTX 5090 under $3000").await;
//! let query = aggregate::build_search_query(&filters);
//! let listings = aggregate::search_all_stores(&fetchers, &query).await;
//! let products = aggregate::build_products(listings, &filters);
//! let ranked = rank::rank_products(products, &filters);
//! ```
//!
//! # Modules
//!
//! - [`parser`] - Query parsing (AI + fallback heuristics)
//! - [`fetch`] - Per-store scrapers and the shared HTTP client
//! - [`aggregate`] - Fan-out search and listing aggregation
//! - [`rank`] - Relevance/value scoring and sorting
//! - [`stores`] - Retailer catalog
//! - [`testing`] - Mock implementations for testing

pub mod aggregate;
pub mod error;
pub mod fetch;
pub mod parser;
pub mod rank;
pub mod stores;
pub mod testing;
pub mod types;

pub use error::{FetchError, FetchResult, ParseError, ParseResult};
pub use fetch::{default_fetchers, StoreClient, StoreFetcher};
pub use parser::{ParserStack, QueryParser};
pub use rank::{rank_products, sort_products, SortKey};
pub use types::{
    BestDeal, BrandFilter, PriceRange, Product, RankedProduct, RawListing, Scores, SearchFilters,
    SpecFilters, StoreMeta, StorePrice,
};
