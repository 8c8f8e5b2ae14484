//! Core ticket data types.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// A single ticket offer extracted from a listing page.
///
/// Tickets only exist for the duration of one polling cycle. Two tickets are
/// equal when every field matches; there is no separate identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticket {
    /// Human-readable listing name (anchor text, verbatim).
    pub title: String,
    /// The href exactly as it appeared in the markup.
    pub relative_link: String,
    /// `relative_link` resolved against the page it was found on.
    pub absolute_url: Url,
    /// Badge texts in document order, trimmed.
    #[serde(default)]
    pub status_labels: Vec<String>,
}

impl Ticket {
    /// Whether the given label is one of this ticket's badges.
    pub fn has_label(&self, label: &str) -> bool {
        self.status_labels.iter().any(|l| l == label)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        for label in &self.status_labels {
            write!(f, "[{}]", label)?;
        }
        Ok(())
    }
}

/// A ticket under construction while the extractor walks a listing block.
///
/// Becomes a [`Ticket`] only once both a link and a title were observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketDraft {
    pub title: Option<String>,
    pub link: Option<(String, Url)>,
    pub status_labels: Vec<String>,
}

impl TicketDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finalize the draft, or `None` if it never saw a link and a title.
    pub fn finish(self) -> Option<Ticket> {
        let title = self.title?;
        let (relative_link, absolute_url) = self.link?;
        Some(Ticket {
            title,
            relative_link,
            absolute_url,
            status_labels: self.status_labels,
        })
    }
}
