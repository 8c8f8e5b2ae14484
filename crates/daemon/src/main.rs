mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use watcher_core::{
    load_config, validate_config, AvailabilityFilter, HttpFetcher, ListingExtractor, LogNotifier,
    NotifierRouter, SanitizedConfig, Severity, SlackNotifier, Watcher,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // The subscriber may not be installed yet.
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Determine config path
    let config_path = std::env::var("WATCHER_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("watcher.toml"));

    // Load configuration
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    // Initialize logging; the guard flushes the log file on drop
    let _log_guard = logging::init_logging(&config.logging)?;

    info!("ticket-watcher {} starting", VERSION);
    info!("Configuration loaded from {:?}", config_path);
    info!(
        "Effective configuration: {}",
        serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default()
    );

    let fetcher = Arc::new(HttpFetcher::new(&config.fetcher).context("Failed to create fetcher")?);

    // Log sink always sees everything; the subscriber filters levels
    let mut router = NotifierRouter::new().with_sink(Severity::Debug, Arc::new(LogNotifier::new()));
    match &config.slack {
        Some(slack_config) => {
            let slack = SlackNotifier::new(slack_config.clone())
                .context("Failed to create Slack notifier")?;
            info!("Slack notifications enabled (min severity {})", slack.min_severity());
            router.add_sink(slack.min_severity(), Arc::new(slack));
        }
        None => info!("No Slack webhook configured"),
    }

    let mut watcher = Watcher::new(config.watcher.clone(), fetcher, Arc::new(router))
        .context("Failed to create watcher")?
        .with_extractor(ListingExtractor::new(&config.extractor))
        .with_filter(AvailabilityFilter::new(&config.filter));

    for target in watcher.targets() {
        info!("Watching {}", target);
    }

    watcher.run_until(shutdown_signal()).await;

    info!("ticket-watcher stopped after {} cycles", watcher.cycles());
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
