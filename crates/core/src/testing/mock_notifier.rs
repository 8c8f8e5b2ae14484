//! Recording notifier for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::notifier::{Notifier, NotifyError, Severity};

/// Notifier that keeps every message it receives.
///
/// Clones share the same recording, so a test can hand one clone to the
/// watcher and inspect another.
///
/// # Example
///
/// ```rust,ignore
/// let notifier = RecordingNotifier::new();
/// watcher_with(Arc::new(notifier.clone())).poll_once().await;
///
/// let warnings = notifier.messages_at(Severity::Warn).await;
/// assert_eq!(warnings.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    name: String,
    messages: Arc<RwLock<Vec<(Severity, String)>>>,
    /// If set, every emit fails with this message (after recording).
    failure: Arc<RwLock<Option<String>>>,
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::named("recording")
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            messages: Arc::new(RwLock::new(Vec::new())),
            failure: Arc::new(RwLock::new(None)),
        }
    }

    /// All recorded messages in emission order.
    pub async fn messages(&self) -> Vec<(Severity, String)> {
        self.messages.read().await.clone()
    }

    /// Recorded message texts with exactly `severity`.
    pub async fn messages_at(&self, severity: Severity) -> Vec<String> {
        self.messages
            .read()
            .await
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Clear recorded messages.
    pub async fn clear(&self) {
        self.messages.write().await.clear();
    }

    /// Make every subsequent emit fail.
    pub async fn fail_with(&self, message: &str) {
        *self.failure.write().await = Some(message.to_string());
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn emit(&self, severity: Severity, message: &str) -> Result<(), NotifyError> {
        self.messages
            .write()
            .await
            .push((severity, message.to_string()));

        match self.failure.read().await.as_ref() {
            Some(failure) => Err(NotifyError::Http(failure.clone())),
            None => Ok(()),
        }
    }
}
