//! Trendyol-specific modules for HTTP client, parsing, and data models.

pub mod client;
pub mod models;
pub mod parser;
pub mod scrape;
pub mod selectors;

pub use client::{FetchError, TrendyolClient, TrendyolFetch};
pub use models::{AttrKey, Attributes, Extracted, Product};
pub use scrape::Scraper;
