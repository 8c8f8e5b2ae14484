//! Listing page extraction.
//!
//! A single pass over the page's token stream, no document tree. The
//! tokenizer adapter (`markup`) feeds events into an explicit state machine
//! (`state`) that assembles [`Ticket`](crate::ticket::Ticket)s.

mod config;
mod markup;
mod state;

pub use config::ExtractorConfig;
pub use markup::{Extraction, ListingExtractor};
pub use state::{has_class, ExtractionAnomaly, ListingState, ListingStateMachine, MarkupEvent};
