//! Subscriber setup: console plus an optional daily-rotated log file.

use anyhow::{Context, Result};
use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use watcher_core::LoggingConfig;

/// HTTP client internals are only interesting when they fail.
const QUIET_DEPENDENCIES: &str = "reqwest=error,hyper=error,hyper_util=error";

/// `level` for everything, with the HTTP stack held at `error`.
fn filter_directives(level: &str) -> String {
    format!("{},{}", level, QUIET_DEPENDENCIES)
}

/// Timestamps in the host's local timezone.
#[derive(Debug, Clone, Copy)]
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = Local::now();
        write!(w, "{}", now.format("%Y-%m-%dT%H:%M:%S%.3f%:z"))
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the console level only; the file always follows
/// `file_level`. Keep the returned guard alive for the lifetime of the
/// process or buffered file output is lost.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(&config.console_level)));
    let console_layer = fmt::layer()
        .with_ansi(true)
        .with_timer(LocalTimer)
        .with_filter(console_filter);

    let (file_layer, guard) = if config.file_enabled {
        std::fs::create_dir_all(&config.directory).with_context(|| {
            format!("Failed to create log directory {:?}", config.directory)
        })?;

        let appender = RollingFileAppender::builder()
            .rotation(Rotation::DAILY)
            .filename_prefix(&config.file_name)
            .max_log_files(config.max_files)
            .build(&config.directory)
            .context("Failed to create log file appender")?;
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        let layer = fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_timer(LocalTimer)
            .with_filter(EnvFilter::new(filter_directives(&config.file_level)));
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to set global default subscriber")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives_quiet_http_stack() {
        let directives = filter_directives("debug");
        assert!(directives.starts_with("debug,"));
        for target in ["reqwest=error", "hyper=error", "hyper_util=error"] {
            assert!(directives.contains(target), "missing {}", target);
        }
    }

    #[test]
    fn test_filter_directives_parse() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            let filter = EnvFilter::try_new(filter_directives(level));
            assert!(filter.is_ok(), "level {} did not parse", level);
        }
    }
}
