// Multi-store price comparison API.
//
// The pricescout library does the heavy lifting (parsing, scraping,
// ranking); this crate wires it to an Axum HTTP surface plus the
// in-memory favorites, price-history and analytics stores.

pub mod analytics;
pub mod config;
pub mod favorites;
pub mod history;
pub mod server;

pub use config::*;
