pub mod config;
pub mod extractor;
pub mod fetcher;
pub mod notifier;
pub mod testing;
pub mod ticket;
pub mod watcher;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, LoggingConfig,
    SanitizedConfig,
};
pub use extractor::{Extraction, ExtractionAnomaly, ExtractorConfig, ListingExtractor};
pub use fetcher::{FetchError, FetchedPage, FetcherConfig, HttpFetcher, PageFetcher};
pub use notifier::{
    LogNotifier, Notifier, NotifierRouter, NotifyError, Severity, SlackConfig, SlackNotifier,
};
pub use ticket::{AvailabilityFilter, FilterConfig, Ticket};
pub use watcher::{CycleReport, Watcher, WatcherConfig, WatcherError};
