//! Types for the watcher loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::ticket::Ticket;

/// Errors raised while setting up a watcher.
#[derive(Debug, Error)]
pub enum WatcherError {
    /// No URLs configured.
    #[error("no URLs to watch")]
    NoTargets,

    /// A configured URL does not parse.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A configured URL is not http(s).
    #[error("unsupported URL scheme in {url}")]
    UnsupportedScheme { url: String },
}

/// Parse one configured page URL.
pub fn parse_target(url: &str) -> Result<Url, WatcherError> {
    let parsed = Url::parse(url).map_err(|e| WatcherError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        _ => Err(WatcherError::UnsupportedScheme {
            url: url.to_string(),
        }),
    }
}

/// A page that could not be used in a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlFailure {
    pub url: Url,
    pub reason: String,
}

/// Outcome of one polling cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    /// Cycle number, starting at 1.
    pub cycle: u64,
    /// When the cycle started.
    pub started_at: DateTime<Utc>,
    /// Wall time the cycle took in milliseconds.
    pub duration_ms: u64,
    /// Tickets extracted across all pages.
    pub tickets_found: usize,
    /// Tickets that passed the availability filter, in page order.
    pub available: Vec<Ticket>,
    /// Pages skipped this cycle.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<UrlFailure>,
    /// Alerts emitted.
    pub notified: usize,
    /// Alerts withheld because the ticket was already announced.
    #[serde(default)]
    pub suppressed: usize,
}
