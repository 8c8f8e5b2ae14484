//! Ticket watcher polling loop.
//!
//! The watcher owns the configured page list and drives each cycle:
//! - **Fetch**: all pages concurrently, failures isolated per page
//! - **Extract**: one pass per page body
//! - **Filter + notify**: one alert per available ticket

mod config;
mod runner;
mod types;

pub use config::WatcherConfig;
pub use runner::Watcher;
pub use types::{parse_target, CycleReport, UrlFailure, WatcherError};
