//! Notifier that writes into the `tracing` pipeline.
//!
//! Where the event ends up (console, rotating file) is decided by the
//! subscriber the binary installs, not here.

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use super::{Notifier, NotifyError, Severity};

/// Target used for notification events so they can be filtered separately.
pub const ALERT_TARGET: &str = "ticket_watcher::alert";

/// Forwards notifications to `tracing` at the matching level.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn emit(&self, severity: Severity, message: &str) -> Result<(), NotifyError> {
        match severity {
            Severity::Debug => debug!(target: ALERT_TARGET, "{}", message),
            Severity::Info => info!(target: ALERT_TARGET, "{}", message),
            Severity::Warn => warn!(target: ALERT_TARGET, "{}", message),
            Severity::Error => error!(target: ALERT_TARGET, "{}", message),
        }
        Ok(())
    }
}
