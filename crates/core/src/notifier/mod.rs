//! Notification sinks.
//!
//! The watcher only knows the `Notifier` trait. The binary composes the
//! concrete sinks (log, Slack) behind a `NotifierRouter` that decides by
//! severity which of them receive a message.

mod log;
mod router;
mod slack;
mod types;

pub use log::{LogNotifier, ALERT_TARGET};
pub use router::NotifierRouter;
pub use slack::{SlackConfig, SlackNotifier};
pub use types::*;
