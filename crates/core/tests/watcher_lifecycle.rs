//! Watcher lifecycle integration tests.
//!
//! These tests drive the watcher with a mock fetcher and recording notifier:
//! - One alert per available ticket, with title and absolute URL
//! - Per-page failures skipped without stopping the cycle
//! - Routing of alerts by severity
//! - Shutdown of the polling loop

use std::sync::Arc;
use std::time::Duration;

use watcher_core::{
    notifier::{Notifier, NotifierRouter, Severity},
    testing::{fixtures, MockFetcher, RecordingNotifier},
    Watcher, WatcherConfig,
};

/// Test helper wiring a watcher to mocks.
struct TestHarness {
    watcher: Watcher,
    fetcher: MockFetcher,
    notifier: RecordingNotifier,
}

impl TestHarness {
    fn new(urls: &[url::Url]) -> Self {
        Self::with_config(WatcherConfig {
            urls: urls.iter().map(|u| u.to_string()).collect(),
            ..Default::default()
        })
    }

    fn with_config(config: WatcherConfig) -> Self {
        let fetcher = MockFetcher::new();
        let notifier = RecordingNotifier::new();
        let watcher = Watcher::new(
            config,
            Arc::new(fetcher.clone()),
            Arc::new(notifier.clone()),
        )
        .expect("Failed to create watcher");

        Self {
            watcher,
            fetcher,
            notifier,
        }
    }
}

#[tokio::test]
async fn test_one_available_ticket_and_one_failing_page() {
    let good = fixtures::search_url(42730);
    let broken = fixtures::search_url(42731);
    let mut harness = TestHarness::new(&[good.clone(), broken.clone()]);

    harness
        .fetcher
        .set_page(
            &good,
            200,
            fixtures::listing_page(&[
                fixtures::listing("/ticket/55", "Summer Live 2026", &["出品中"]),
                fixtures::listing("/ticket/56", "Summer Live 2026 Day 2", &["売切れ"]),
            ]),
        )
        .await;
    harness.fetcher.set_page(&broken, 500, "oops").await;

    let report = harness.watcher.poll_once().await;

    assert_eq!(report.tickets_found, 2);
    assert_eq!(report.available.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].url, broken);

    let warnings = harness.notifier.messages_at(Severity::Warn).await;
    assert_eq!(
        warnings,
        vec!["Summer Live 2026 https://tiketore.com/ticket/55".to_string()]
    );

    let debug = harness.notifier.messages_at(Severity::Debug).await;
    assert_eq!(debug, vec!["Found 2 tickets".to_string()]);

    // Both pages were attempted
    assert_eq!(harness.fetcher.fetch_count().await, 2);
}

#[tokio::test]
async fn test_alerts_follow_configured_url_order() {
    let first = fixtures::search_url(1);
    let second = fixtures::search_url(2);
    let mut harness = TestHarness::new(&[first.clone(), second.clone()]);

    // Slow fetches still report in configured order
    harness.fetcher.set_delay(Duration::from_millis(5)).await;
    harness
        .fetcher
        .set_page(
            &first,
            200,
            fixtures::listing_page(&[fixtures::listing("/ticket/1", "First", &["出品中"])]),
        )
        .await;
    harness
        .fetcher
        .set_page(
            &second,
            200,
            fixtures::listing_page(&[fixtures::listing("/ticket/2", "Second", &["出品中"])]),
        )
        .await;

    harness.watcher.poll_once().await;

    let warnings = harness.notifier.messages_at(Severity::Warn).await;
    assert_eq!(
        warnings,
        vec![
            "First https://tiketore.com/ticket/1".to_string(),
            "Second https://tiketore.com/ticket/2".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_all_pages_failing_still_reports_zero() {
    let a = fixtures::search_url(1);
    let b = fixtures::search_url(2);
    let mut harness = TestHarness::new(&[a.clone(), b.clone()]);

    harness.fetcher.set_connection_failure(&a, "refused").await;
    harness.fetcher.set_timeout(&b).await;

    let report = harness.watcher.poll_once().await;
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.tickets_found, 0);
    assert!(harness.notifier.messages_at(Severity::Warn).await.is_empty());
    assert_eq!(
        harness.notifier.messages_at(Severity::Debug).await,
        vec!["Found 0 tickets".to_string()]
    );
}

#[tokio::test]
async fn test_page_recovers_on_next_cycle() {
    let page = fixtures::search_url(42730);
    let mut harness = TestHarness::new(&[page.clone()]);

    harness.fetcher.set_page(&page, 503, "maintenance").await;
    let first = harness.watcher.poll_once().await;
    assert_eq!(first.failures.len(), 1);

    harness
        .fetcher
        .set_page(
            &page,
            200,
            fixtures::listing_page(&[fixtures::listing("/ticket/9", "Encore", &["出品中"])]),
        )
        .await;
    let second = harness.watcher.poll_once().await;
    assert!(second.failures.is_empty());
    assert_eq!(second.available.len(), 1);
    assert_eq!(harness.watcher.cycles(), 2);
}

#[tokio::test]
async fn test_router_sends_only_warnings_to_chat() {
    let page = fixtures::search_url(42730);
    let fetcher = MockFetcher::new();
    fetcher
        .set_page(
            &page,
            200,
            fixtures::listing_page(&[fixtures::listing("/ticket/55", "Summer Live", &["出品中"])]),
        )
        .await;

    let log = RecordingNotifier::named("log");
    let chat = RecordingNotifier::named("chat");
    let router = NotifierRouter::new()
        .with_sink(Severity::Debug, Arc::new(log.clone()))
        .with_sink(Severity::Warn, Arc::new(chat.clone()));
    assert_eq!(router.name(), "router");

    let mut watcher = Watcher::new(
        WatcherConfig {
            urls: vec![page.to_string()],
            ..Default::default()
        },
        Arc::new(fetcher),
        Arc::new(router),
    )
    .unwrap();

    watcher.poll_once().await;

    assert_eq!(log.messages().await.len(), 2);
    assert_eq!(
        chat.messages().await,
        vec![(
            Severity::Warn,
            "Summer Live https://tiketore.com/ticket/55".to_string()
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn test_run_until_stops_on_shutdown() {
    let page = fixtures::search_url(42730);
    let mut harness = TestHarness::with_config(WatcherConfig {
        urls: vec![page.to_string()],
        poll_interval_secs: 10,
        ..Default::default()
    });
    harness
        .fetcher
        .set_page(&page, 200, fixtures::listing_page(&[]))
        .await;

    harness
        .watcher
        .run_until(tokio::time::sleep(Duration::from_secs(25)))
        .await;

    // Cycles at t=0, 10 and 20
    assert_eq!(harness.watcher.cycles(), 3);

    let debug = harness.notifier.messages_at(Severity::Debug).await;
    assert_eq!(debug.first().map(String::as_str), Some("Start watching"));
    assert_eq!(debug.last().map(String::as_str), Some("Stop watching"));
}
