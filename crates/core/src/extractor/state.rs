//! Listing state machine driven by markup events.
//!
//! The machine never fails. Every `(state, event)` pair has a defined
//! outcome; pairs with no meaning for the current state leave it unchanged.
//! Irregular markup is recorded as an [`ExtractionAnomaly`] and the machine
//! carries on with the rest of the page.

use tracing::trace;
use url::Url;

use crate::ticket::{Ticket, TicketDraft};

use super::config::ExtractorConfig;

/// A tokenizer event, reduced to what the state machine consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    /// Start tag with lowercased name and attributes in document order.
    StartTag {
        name: String,
        attrs: Vec<(String, String)>,
    },
    /// End tag with lowercased name.
    EndTag { name: String },
    /// One uninterrupted run of text, character references decoded.
    Text(String),
}

impl MarkupEvent {
    pub fn start(name: &str, attrs: &[(&str, &str)]) -> Self {
        Self::StartTag {
            name: name.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn end(name: &str) -> Self {
        Self::EndTag {
            name: name.to_string(),
        }
    }

    pub fn text(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Look up an attribute value by name.
pub fn attr<'a>(attrs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Whitespace-tokenized exact-word class match. No class attribute means no classes.
pub fn has_class(attrs: &[(String, String)], class: &str) -> bool {
    attr(attrs, "class")
        .map(|classes| classes.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

/// Where the machine is within the current listing block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingState {
    /// Outside any listing, waiting for the listing marker.
    SeekingListing,
    /// Inside a listing, waiting for an anchor, a badge or the closing tag.
    InListing,
    /// Anchor seen; the next text is the title.
    AwaitingTitleText,
    /// Badge seen; the next text is a status label.
    AwaitingStatusText,
}

/// Markup that did not fit the expected listing structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionAnomaly {
    /// A new listing started before the previous one was closed.
    NestedListing,
    /// An anchor inside a listing that already has a link.
    DuplicateAnchor,
    /// An anchor without an `href` attribute.
    MissingHref,
    /// An `href` that could not be resolved against the page URL.
    UnresolvableHref { href: String, reason: String },
    /// The anchor closed before any title text.
    EmptyTitle,
    /// The badge closed before any label text.
    EmptyBadge,
    /// A listing closed without both a link and a title.
    IncompleteListing,
    /// The page ended inside a listing.
    UnclosedListing,
}

/// Consumes markup events for one page and collects finished tickets.
#[derive(Debug)]
pub struct ListingStateMachine<'a> {
    markers: &'a ExtractorConfig,
    page_url: &'a Url,
    state: ListingState,
    draft: TicketDraft,
    tickets: Vec<Ticket>,
    anomalies: Vec<ExtractionAnomaly>,
}

impl<'a> ListingStateMachine<'a> {
    /// `markers` must already have lowercased tag names.
    pub fn new(markers: &'a ExtractorConfig, page_url: &'a Url) -> Self {
        Self {
            markers,
            page_url,
            state: ListingState::SeekingListing,
            draft: TicketDraft::new(),
            tickets: Vec::new(),
            anomalies: Vec::new(),
        }
    }

    pub fn state(&self) -> ListingState {
        self.state
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Advance the machine by one event.
    pub fn handle(&mut self, event: &MarkupEvent) {
        if let MarkupEvent::StartTag { attrs, .. } = event {
            if has_class(attrs, &self.markers.listing_class) {
                self.open_listing();
                return;
            }
        }

        self.state = match (self.state, event) {
            (ListingState::SeekingListing, _) => ListingState::SeekingListing,

            (ListingState::InListing, MarkupEvent::StartTag { name, attrs })
                if *name == self.markers.anchor_tag =>
            {
                self.on_anchor(attrs)
            }
            (ListingState::InListing, MarkupEvent::StartTag { name, attrs })
                if *name == self.markers.badge_tag
                    && has_class(attrs, &self.markers.badge_class) =>
            {
                ListingState::AwaitingStatusText
            }
            (ListingState::InListing, MarkupEvent::EndTag { name })
                if *name == self.markers.closing_tag =>
            {
                self.close_listing();
                ListingState::SeekingListing
            }

            (ListingState::AwaitingTitleText, MarkupEvent::Text(text))
                if !text.trim().is_empty() =>
            {
                self.draft.title = Some(text.clone());
                ListingState::InListing
            }
            (ListingState::AwaitingTitleText, MarkupEvent::EndTag { name })
                if *name == self.markers.anchor_tag =>
            {
                self.anomaly(ExtractionAnomaly::EmptyTitle);
                ListingState::InListing
            }

            (ListingState::AwaitingStatusText, MarkupEvent::Text(text))
                if !text.trim().is_empty() =>
            {
                self.draft.status_labels.push(text.trim().to_string());
                ListingState::InListing
            }
            (ListingState::AwaitingStatusText, MarkupEvent::EndTag { name })
                if *name == self.markers.badge_tag =>
            {
                self.anomaly(ExtractionAnomaly::EmptyBadge);
                ListingState::InListing
            }

            (state, _) => state,
        };
    }

    /// End of input. Returns the finished tickets and the anomalies seen.
    pub fn finish(mut self) -> (Vec<Ticket>, Vec<ExtractionAnomaly>) {
        if self.state != ListingState::SeekingListing {
            self.anomaly(ExtractionAnomaly::UnclosedListing);
        }
        (self.tickets, self.anomalies)
    }

    fn open_listing(&mut self) {
        if self.state != ListingState::SeekingListing {
            self.anomaly(ExtractionAnomaly::NestedListing);
        }
        self.draft = TicketDraft::new();
        self.state = ListingState::InListing;
    }

    fn on_anchor(&mut self, attrs: &[(String, String)]) -> ListingState {
        if self.draft.link.is_some() {
            self.anomaly(ExtractionAnomaly::DuplicateAnchor);
            return ListingState::InListing;
        }

        let Some(href) = attr(attrs, "href") else {
            self.anomaly(ExtractionAnomaly::MissingHref);
            return ListingState::InListing;
        };

        match self.page_url.join(href) {
            Ok(absolute) => {
                self.draft.link = Some((href.to_string(), absolute));
                ListingState::AwaitingTitleText
            }
            Err(e) => {
                self.anomaly(ExtractionAnomaly::UnresolvableHref {
                    href: href.to_string(),
                    reason: e.to_string(),
                });
                ListingState::InListing
            }
        }
    }

    fn close_listing(&mut self) {
        match std::mem::take(&mut self.draft).finish() {
            Some(ticket) => {
                trace!(ticket = %ticket, "Listing finalized");
                self.tickets.push(ticket);
            }
            None => self.anomaly(ExtractionAnomaly::IncompleteListing),
        }
    }

    fn anomaly(&mut self, anomaly: ExtractionAnomaly) {
        trace!(page = %self.page_url, state = ?self.state, anomaly = ?anomaly, "Extraction anomaly");
        self.anomalies.push(anomaly);
    }
}
