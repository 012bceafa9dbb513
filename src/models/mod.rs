// src/models/mod.rs

//! Domain models for the collector.
//!
//! Configuration lives in [`config`]; postings, identifiers and the search
//! query in [`posting`].

mod config;
mod posting;

// Re-export all public types
pub use config::{
    Config, CrawlerConfig, PathsConfig, SearchConfig, SelectorConfig, parse_selector,
};
pub use posting::{PostingId, PostingRecord, SearchQuery};
