//! Watcher configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the polling loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatcherConfig {
    /// Listing pages to poll, in order. Must be absolute http(s) URLs.
    #[serde(default)]
    pub urls: Vec<String>,

    /// Pause between two polling cycles (seconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Announce each available ticket only once per process lifetime.
    /// Off by default: every cycle re-reports everything still available.
    #[serde(default)]
    pub dedupe_notifications: bool,
}

fn default_poll_interval() -> u64 {
    60
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            poll_interval_secs: default_poll_interval(),
            dedupe_notifications: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WatcherConfig::default();
        assert!(config.urls.is_empty());
        assert_eq!(config.poll_interval_secs, 60);
        assert!(!config.dedupe_notifications);
    }

    #[test]
    fn test_deserialize_minimal() {
        let toml = r#"
            urls = ["https://tiketore.com/tickets/search?perform_id=42730"]
        "#;
        let config: WatcherConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.urls.len(), 1);
        assert_eq!(config.poll_interval_secs, 60);
        assert!(!config.dedupe_notifications);
    }

    #[test]
    fn test_deserialize_full() {
        let toml = r#"
            urls = [
                "https://tiketore.com/tickets/search?perform_id=42730",
                "https://tiketore.com/tickets/search?perform_id=42731",
            ]
            poll_interval_secs = 15
            dedupe_notifications = true
        "#;
        let config: WatcherConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.urls.len(), 2);
        assert_eq!(config.poll_interval_secs, 15);
        assert!(config.dedupe_notifications);
    }
}
