use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides (`WATCHER_FETCHER__TIMEOUT_SECS=10`).
pub const ENV_PREFIX: &str = "WATCHER_";

/// Load configuration from file with environment variable overrides
///
/// Besides the generic `WATCHER_<SECTION>__<KEY>` overrides, the Slack
/// webhook can be given as `WATCHER_SLACK_WEBHOOK_URL` and
/// `WATCHER_SLACK_USERNAME`, which keeps the credential out of the file.
/// The username is ignored unless a webhook is configured somewhere.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let mut figment = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(slack_env(&["webhook_url"]));

    // Username alone does not enable Slack
    if figment.find_value("slack.webhook_url").is_ok() {
        figment = figment.merge(slack_env(&["username"]));
    }

    let config: Config = figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// `WATCHER_SLACK_<KEY>` variables for the given keys, nested under `slack`.
fn slack_env(keys: &[&str]) -> Env {
    Env::prefixed("WATCHER_SLACK_")
        .only(keys)
        .map(|key| format!("slack.{}", key.as_str().to_ascii_lowercase()).into())
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
