use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::extractor::ExtractorConfig;
use crate::fetcher::FetcherConfig;
use crate::notifier::{Severity, SlackConfig};
use crate::ticket::FilterConfig;
use crate::watcher::WatcherConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub watcher: WatcherConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Chat alerts; absent disables the Slack sink.
    #[serde(default)]
    pub slack: Option<SlackConfig>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Level for console output (overridden by `RUST_LOG`).
    #[serde(default = "default_console_level")]
    pub console_level: String,
    /// Write a rotating log file.
    #[serde(default = "default_true")]
    pub file_enabled: bool,
    /// Level for the log file.
    #[serde(default = "default_file_level")]
    pub file_level: String,
    /// Directory holding the log files.
    #[serde(default = "default_log_dir")]
    pub directory: PathBuf,
    /// Base name of the log files; a date suffix is added on rotation.
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Rotated files kept, including the current one.
    #[serde(default = "default_max_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console_level: default_console_level(),
            file_enabled: true,
            file_level: default_file_level(),
            directory: default_log_dir(),
            file_name: default_file_name(),
            max_files: default_max_files(),
        }
    }
}

fn default_console_level() -> String {
    "info".to_string()
}

fn default_file_level() -> String {
    "debug".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_name() -> String {
    "watcher.log".to_string()
}

fn default_max_files() -> usize {
    10
}

/// Sanitized config for startup logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub watcher: WatcherConfig,
    pub fetcher: FetcherConfig,
    pub extractor: ExtractorConfig,
    pub filter: FilterConfig,
    pub logging: LoggingConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack: Option<SanitizedSlackConfig>,
}

/// Sanitized Slack config (webhook URL hidden, it embeds the credential)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSlackConfig {
    pub webhook_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub min_severity: Severity,
    pub timeout_secs: u64,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            watcher: config.watcher.clone(),
            fetcher: config.fetcher.clone(),
            extractor: config.extractor.clone(),
            filter: config.filter.clone(),
            logging: config.logging.clone(),
            slack: config.slack.as_ref().map(|s| SanitizedSlackConfig {
                webhook_configured: !s.webhook_url.is_empty(),
                username: s.username.clone(),
                min_severity: s.min_severity,
                timeout_secs: s.timeout_secs,
            }),
        }
    }
}
