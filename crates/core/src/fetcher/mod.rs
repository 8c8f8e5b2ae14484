//! Listing page retrieval.
//!
//! The `PageFetcher` trait hides the HTTP transport from the watcher loop so
//! tests can substitute canned pages.

mod config;
mod http;
mod types;

pub use config::FetcherConfig;
pub use http::HttpFetcher;
pub use types::*;
