use tracing::level_filters::LevelFilter;

use super::{types::Config, ConfigError};
use crate::watcher::parse_target;

/// Validate configuration
/// Currently validates:
/// - At least one watched URL, all absolute http(s)
/// - Poll interval and timeouts are not 0
/// - Extractor markers and availability marker are not empty
/// - Log levels parse and at least one log file is kept
/// - Slack webhook is an http(s) URL when configured
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Watcher validation
    if config.watcher.urls.is_empty() {
        return Err(ConfigError::ValidationError(
            "watcher.urls must list at least one page".to_string(),
        ));
    }
    for url in &config.watcher.urls {
        parse_target(url)
            .map_err(|e| ConfigError::ValidationError(format!("watcher.urls: {}", e)))?;
    }
    if config.watcher.poll_interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "watcher.poll_interval_secs cannot be 0".to_string(),
        ));
    }

    if config.fetcher.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "fetcher.timeout_secs cannot be 0".to_string(),
        ));
    }

    let markers = [
        ("extractor.listing_class", &config.extractor.listing_class),
        ("extractor.anchor_tag", &config.extractor.anchor_tag),
        ("extractor.badge_tag", &config.extractor.badge_tag),
        ("extractor.badge_class", &config.extractor.badge_class),
        ("extractor.closing_tag", &config.extractor.closing_tag),
        ("filter.available_marker", &config.filter.available_marker),
    ];
    for (name, value) in markers {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                name
            )));
        }
    }

    // Logging validation
    for (name, level) in [
        ("logging.console_level", &config.logging.console_level),
        ("logging.file_level", &config.logging.file_level),
    ] {
        level.parse::<LevelFilter>().map_err(|_| {
            ConfigError::ValidationError(format!("{} is not a log level: {}", name, level))
        })?;
    }
    if config.logging.file_enabled && config.logging.max_files == 0 {
        return Err(ConfigError::ValidationError(
            "logging.max_files cannot be 0".to_string(),
        ));
    }

    // Slack validation
    if let Some(slack) = &config.slack {
        parse_target(&slack.webhook_url)
            .map_err(|e| ConfigError::ValidationError(format!("slack.webhook_url: {}", e)))?;
        if slack.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "slack.timeout_secs cannot be 0".to_string(),
            ));
        }
    }

    Ok(())
}
