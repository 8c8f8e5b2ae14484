//! Availability predicate over ticket status labels.

use serde::{Deserialize, Serialize};

use super::Ticket;

/// Badge text the reference site shows on listings that can be bought now.
pub const DEFAULT_AVAILABLE_MARKER: &str = "出品中";

/// Configuration for the availability filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterConfig {
    /// Exact status label meaning "currently purchasable".
    #[serde(default = "default_marker")]
    pub available_marker: String,
}

fn default_marker() -> String {
    DEFAULT_AVAILABLE_MARKER.to_string()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            available_marker: default_marker(),
        }
    }
}

/// Selects tickets whose labels contain the availability marker.
#[derive(Debug, Clone)]
pub struct AvailabilityFilter {
    marker: String,
}

impl AvailabilityFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            marker: config.available_marker.clone(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// True iff the exact marker is one of the ticket's labels.
    pub fn is_available(&self, ticket: &Ticket) -> bool {
        ticket.has_label(&self.marker)
    }

    /// Borrowing iterator over the available tickets, in input order.
    pub fn available<'a>(&'a self, tickets: &'a [Ticket]) -> impl Iterator<Item = &'a Ticket> {
        tickets.iter().filter(move |t| self.is_available(t))
    }
}

impl Default for AvailabilityFilter {
    fn default() -> Self {
        Self::new(&FilterConfig::default())
    }
}
