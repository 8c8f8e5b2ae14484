//! Polling loop implementation.
//!
//! Each cycle fetches every configured page, extracts tickets, filters the
//! available ones and alerts on them, then sleeps for the configured
//! interval. Per-page failures skip that page for the cycle only; nothing in
//! a cycle stops the loop.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, warn};
use url::Url;

use crate::extractor::ListingExtractor;
use crate::fetcher::{FetchError, PageFetcher};
use crate::notifier::{Notifier, Severity};
use crate::ticket::{AvailabilityFilter, Ticket};

use super::config::WatcherConfig;
use super::types::{parse_target, CycleReport, UrlFailure, WatcherError};

/// Drives fetch → extract → filter → notify on a fixed interval.
pub struct Watcher {
    config: WatcherConfig,
    targets: Vec<Url>,
    fetcher: Arc<dyn PageFetcher>,
    notifier: Arc<dyn Notifier>,
    extractor: ListingExtractor,
    filter: AvailabilityFilter,

    // Runtime state
    cycles: u64,
    announced: HashSet<Url>,
}

impl Watcher {
    /// Create a watcher with the default extractor markers and availability marker.
    pub fn new(
        config: WatcherConfig,
        fetcher: Arc<dyn PageFetcher>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, WatcherError> {
        if config.urls.is_empty() {
            return Err(WatcherError::NoTargets);
        }

        let targets = config
            .urls
            .iter()
            .map(|u| parse_target(u))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            targets,
            fetcher,
            notifier,
            extractor: ListingExtractor::default(),
            filter: AvailabilityFilter::default(),
            cycles: 0,
            announced: HashSet::new(),
        })
    }

    /// Use a custom extractor.
    pub fn with_extractor(mut self, extractor: ListingExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Use a custom availability filter.
    pub fn with_filter(mut self, filter: AvailabilityFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn targets(&self) -> &[Url] {
        &self.targets
    }

    /// Pause between cycles.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.config.poll_interval_secs)
    }

    /// Number of cycles run so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Run cycles until `shutdown` resolves.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        info!(
            targets = self.targets.len(),
            interval_secs = self.config.poll_interval_secs,
            dedupe = self.config.dedupe_notifications,
            "Watcher started"
        );
        self.notify(Severity::Debug, "Start watching").await;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Watcher received shutdown signal");
                    break;
                }
                _ = self.poll_once() => {}
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("Watcher received shutdown signal");
                    break;
                }
                _ = tokio::time::sleep(self.interval()) => {}
            }
        }

        self.notify(Severity::Debug, "Stop watching").await;
        info!(cycles = self.cycles, "Watcher stopped");
    }

    /// Run cycles until the process exits.
    pub async fn run(&mut self) {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Run exactly one polling cycle.
    pub async fn poll_once(&mut self) -> CycleReport {
        let started_at = Utc::now();
        let start = Instant::now();
        self.cycles += 1;

        let (tickets, failures) = self.collect_tickets().await;
        let available: Vec<Ticket> = self.filter.available(&tickets).cloned().collect();

        self.notify(Severity::Debug, &format!("Found {} tickets", tickets.len()))
            .await;

        let mut notified = 0;
        let mut suppressed = 0;
        for ticket in &available {
            if self.config.dedupe_notifications
                && !self.announced.insert(ticket.absolute_url.clone())
            {
                debug!(url = %ticket.absolute_url, "Already announced, skipping");
                suppressed += 1;
                continue;
            }
            self.notify(
                Severity::Warn,
                &format!("{} {}", ticket.title, ticket.absolute_url),
            )
            .await;
            notified += 1;
        }

        let duration_ms = start.elapsed().as_millis() as u64;

        debug!(
            cycle = self.cycles,
            tickets = tickets.len(),
            available = available.len(),
            failed_pages = failures.len(),
            notified = notified,
            suppressed = suppressed,
            duration_ms = duration_ms,
            "Poll cycle complete"
        );

        CycleReport {
            cycle: self.cycles,
            started_at,
            duration_ms,
            tickets_found: tickets.len(),
            available,
            failures,
            notified,
            suppressed,
        }
    }

    /// Fetch all pages concurrently and extract their tickets.
    ///
    /// Results are joined in configured URL order, so the ticket order is the
    /// same as with sequential fetching.
    async fn collect_tickets(&self) -> (Vec<Ticket>, Vec<UrlFailure>) {
        let fetcher = self.fetcher.as_ref();
        let fetches = self
            .targets
            .iter()
            .map(|url| async move { (url, fetch_body(fetcher, url).await) });

        let results = join_all(fetches).await;

        let mut tickets = Vec::new();
        let mut failures = Vec::new();

        for (url, result) in results {
            match result {
                Ok(body) => {
                    let found = self.extractor.extract(&body, url);
                    debug!(url = %url, tickets = found.len(), "Page processed");
                    tickets.extend(found);
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Skipping page for this cycle");
                    failures.push(UrlFailure {
                        url: url.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        (tickets, failures)
    }

    async fn notify(&self, severity: Severity, message: &str) {
        if let Err(e) = self.notifier.emit(severity, message).await {
            warn!(
                notifier = self.notifier.name(),
                error = %e,
                "Failed to deliver notification"
            );
        }
    }
}

/// Fetch a page and keep only successful bodies.
async fn fetch_body(fetcher: &dyn PageFetcher, url: &Url) -> Result<String, FetchError> {
    let page = fetcher.fetch(url).await?;
    if !page.is_success() {
        return Err(FetchError::Status(page.status));
    }
    Ok(page.body)
}
