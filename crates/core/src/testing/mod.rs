//! Testing utilities and mock implementations.
//!
//! Mock implementations of the collaborator traits, so the watcher loop can
//! be exercised end to end without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use watcher_core::testing::{fixtures, MockFetcher, RecordingNotifier};
//!
//! let fetcher = MockFetcher::new();
//! fetcher.set_page(&url, 200, fixtures::listing_page(&[
//!     fixtures::listing("/ticket/55", "Summer Live", &["出品中"]),
//! ])).await;
//!
//! let notifier = RecordingNotifier::new();
//! // Hand both to a Watcher...
//! ```

mod mock_fetcher;
mod mock_notifier;

pub use mock_fetcher::{MockFetcher, RecordedFetch};
pub use mock_notifier::RecordingNotifier;

/// Test fixtures and helper functions.
pub mod fixtures {
    use url::Url;

    use crate::ticket::Ticket;

    /// Search page URL on the reference site for a performance id.
    pub fn search_url(perform_id: u32) -> Url {
        Url::parse(&format!(
            "https://tiketore.com/tickets/search?perform_id={}",
            perform_id
        ))
        .expect("fixture URL is valid")
    }

    /// One listing block in the reference site's markup.
    pub fn listing(href: &str, title: &str, badges: &[&str]) -> String {
        let badges: String = badges
            .iter()
            .map(|b| format!("\n      <span class=\"badge badge-pill\">{}</span>", b))
            .collect();
        format!(
            r#"
  <div class="list-ticket clearfix">
    <div class="list-ticket-title">
      <a href="{href}">{title}</a>
    </div>
    <small>{badges}
    </small>
  </div>"#
        )
    }

    /// A full page wrapping the given listing blocks.
    pub fn listing_page(listings: &[String]) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="ja">
<head>
  <meta charset="utf-8">
  <title>チケット検索 | チケトレ</title>
  <script>window.dataLayer = window.dataLayer || [];</script>
</head>
<body>
  <nav class="navbar"><a href="/">Top</a></nav>
  <div class="ticket-list">{}
  </div>
</body>
</html>"#,
            listings.concat()
        )
    }

    /// A ticket as the extractor would produce it for `listing(href, title, labels)`.
    pub fn ticket(page: &Url, href: &str, title: &str, labels: &[&str]) -> Ticket {
        Ticket {
            title: title.to_string(),
            relative_link: href.to_string(),
            absolute_url: page.join(href).expect("fixture href resolves"),
            status_labels: labels.iter().map(|s| s.to_string()).collect(),
        }
    }
}
