//! Ticket records extracted from listing pages.

mod availability;
mod types;

pub use availability::{AvailabilityFilter, FilterConfig, DEFAULT_AVAILABLE_MARKER};
pub use types::{Ticket, TicketDraft};
