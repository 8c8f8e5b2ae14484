//! Mock page fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use url::Url;

use crate::fetcher::{FetchError, FetchedPage, PageFetcher};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    /// The URL that was requested.
    pub url: Url,
    /// When the fetch was made.
    pub timestamp: Instant,
}

/// Canned outcome for one URL.
#[derive(Debug, Clone)]
enum MockResponse {
    Page(FetchedPage),
    ConnectionFailed(String),
    Timeout,
}

/// Mock implementation of the PageFetcher trait.
///
/// Provides controllable behavior for testing:
/// - Serve configurable pages per URL (unknown URLs get a 404 page)
/// - Simulate transport failures and slow responses
/// - Track fetched URLs for assertions
///
/// # Example
///
/// ```rust,ignore
/// use watcher_core::testing::{MockFetcher, fixtures};
///
/// let fetcher = MockFetcher::new();
/// fetcher.set_page(&url, 200, fixtures::listing_page(&[/* listings */])).await;
/// fetcher.set_connection_failure(&other_url, "refused").await;
///
/// let page = fetcher.fetch(&url).await?;
/// assert_eq!(fetcher.fetch_count().await, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    /// Configured responses by URL.
    responses: Arc<RwLock<HashMap<String, MockResponse>>>,
    /// Recorded fetches.
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    /// Simulated latency per fetch.
    delay: Arc<RwLock<Duration>>,
}

impl MockFetcher {
    /// Create a new mock fetcher with no pages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with `status` for `url`.
    pub async fn set_page(&self, url: &Url, status: u16, body: impl Into<String>) {
        self.responses.write().await.insert(
            url.to_string(),
            MockResponse::Page(FetchedPage::new(status, body)),
        );
    }

    /// Make fetches of `url` fail as if the connection was refused.
    pub async fn set_connection_failure(&self, url: &Url, message: &str) {
        self.responses
            .write()
            .await
            .insert(url.to_string(), MockResponse::ConnectionFailed(message.to_string()));
    }

    /// Make fetches of `url` time out.
    pub async fn set_timeout(&self, url: &Url) {
        self.responses
            .write()
            .await
            .insert(url.to_string(), MockResponse::Timeout);
    }

    /// Remove any configured response for `url`.
    pub async fn clear(&self, url: &Url) {
        self.responses.write().await.remove(url.as_str());
    }

    /// Delay every fetch by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Get recorded fetches.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// Get the number of fetches performed.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        self.fetches.write().await.push(RecordedFetch {
            url: url.clone(),
            timestamp: Instant::now(),
        });

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let response = self.responses.read().await.get(url.as_str()).cloned();
        match response {
            Some(MockResponse::Page(page)) => Ok(page),
            Some(MockResponse::ConnectionFailed(message)) => {
                Err(FetchError::ConnectionFailed(message))
            }
            Some(MockResponse::Timeout) => Err(FetchError::Timeout),
            None => Ok(FetchedPage::new(404, "Not Found")),
        }
    }
}
