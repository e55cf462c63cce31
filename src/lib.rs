//! trendyol-scout - scrape a Trendyol category into a local search index
//! and serve keyword search with price facets over a small web UI.

pub mod commands;
pub mod config;
pub mod search;
pub mod trendyol;
pub mod web;

pub use config::Config;
pub use search::{PriceBucket, SearchHit, SearchIndex, SearchOutcome};
pub use trendyol::models::{AttrKey, Attributes, Extracted, Product};
