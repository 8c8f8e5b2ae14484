//! Types for page fetching.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Raw response for one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as text.
    pub body: String,
}

impl FetchedPage {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Errors that can occur while fetching a page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Request failed: {0}")]
    Request(String),
}

/// Retrieves raw markup for a URL.
///
/// Non-2xx responses are returned as pages, not errors; the caller decides
/// what counts as usable.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetcher name for logging.
    fn name(&self) -> &str;

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}
