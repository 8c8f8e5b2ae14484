//! Severity-based fan-out across several sinks.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::{Notifier, NotifyError, Severity};

struct Route {
    min_severity: Severity,
    sink: Arc<dyn Notifier>,
}

/// Forwards each notification to every sink whose threshold it meets.
///
/// Sinks are tried in registration order. A failing sink is logged and does
/// not prevent delivery to the rest; the first failure is returned once all
/// sinks were tried.
#[derive(Default)]
pub struct NotifierRouter {
    routes: Vec<Route>,
}

impl NotifierRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sink that receives `min_severity` and above.
    pub fn with_sink(mut self, min_severity: Severity, sink: Arc<dyn Notifier>) -> Self {
        self.add_sink(min_severity, sink);
        self
    }

    pub fn add_sink(&mut self, min_severity: Severity, sink: Arc<dyn Notifier>) {
        self.routes.push(Route { min_severity, sink });
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Names of the sinks that would receive a notification of `severity`.
    pub fn sinks_for(&self, severity: Severity) -> Vec<&str> {
        self.routes
            .iter()
            .filter(|r| severity >= r.min_severity)
            .map(|r| r.sink.name())
            .collect()
    }
}

impl std::fmt::Debug for NotifierRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let routes: Vec<_> = self
            .routes
            .iter()
            .map(|r| (r.sink.name(), r.min_severity))
            .collect();
        f.debug_struct("NotifierRouter").field("routes", &routes).finish()
    }
}

#[async_trait]
impl Notifier for NotifierRouter {
    fn name(&self) -> &str {
        "router"
    }

    async fn emit(&self, severity: Severity, message: &str) -> Result<(), NotifyError> {
        let mut first_error = None;

        for route in self.routes.iter().filter(|r| severity >= r.min_severity) {
            if let Err(e) = route.sink.emit(severity, message).await {
                warn!(sink = route.sink.name(), error = %e, "Notification sink failed");
                first_error.get_or_insert(NotifyError::Sink {
                    sink: route.sink.name().to_string(),
                    message: e.to_string(),
                });
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingNotifier;

    #[test]
    fn test_routes_by_threshold() {
        let log = RecordingNotifier::named("log");
        let slack = RecordingNotifier::named("slack");
        let router = NotifierRouter::new()
            .with_sink(Severity::Debug, Arc::new(log.clone()))
            .with_sink(Severity::Warn, Arc::new(slack.clone()));

        assert_eq!(router.len(), 2);

        tokio_test::block_on(async {
            router.emit(Severity::Debug, "Found 3 tickets").await.unwrap();
            router
                .emit(Severity::Warn, "Title https://example.com/t/1")
                .await
                .unwrap();

            assert_eq!(log.messages().await.len(), 2);
            assert_eq!(
                slack.messages().await,
                vec![(Severity::Warn, "Title https://example.com/t/1".to_string())]
            );
        });
    }

    #[test]
    fn test_sinks_for() {
        let router = NotifierRouter::new()
            .with_sink(Severity::Debug, Arc::new(RecordingNotifier::named("log")))
            .with_sink(Severity::Warn, Arc::new(RecordingNotifier::named("slack")));

        assert_eq!(router.sinks_for(Severity::Info), vec!["log"]);
        assert_eq!(router.sinks_for(Severity::Error), vec!["log", "slack"]);
    }

    #[tokio::test]
    async fn test_failing_sink_does_not_block_others() {
        let broken = RecordingNotifier::named("broken");
        broken.fail_with("webhook down").await;
        let log = RecordingNotifier::named("log");

        let router = NotifierRouter::new()
            .with_sink(Severity::Debug, Arc::new(broken))
            .with_sink(Severity::Debug, Arc::new(log.clone()));

        let result = router.emit(Severity::Warn, "alert").await;

        assert!(matches!(result, Err(NotifyError::Sink { ref sink, .. }) if sink == "broken"));
        assert_eq!(log.messages().await.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_router_is_noop() {
        let router = NotifierRouter::new();
        assert!(router.is_empty());
        assert!(router.emit(Severity::Error, "nothing listens").await.is_ok());
    }
}
