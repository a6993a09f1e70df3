//! Reel Harvest: a concurrent movie-ranking scraper
//!
//! This crate fetches the paginated Douban Top 250 listing, extracts one
//! record per movie with CSS selectors, and stores every record in SQLite.
//! Each page is handled by its own worker; a dispatcher waits for all of them
//! and reports per-page failures once the whole run is done.

pub mod config;
pub mod crawler;
pub mod record;
pub mod storage;

use thiserror::Error;

/// Main error type for Reel Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid request header '{name}': {message}")]
    InvalidHeader { name: String, message: String },

    #[error("Worker for offset {offset} exited without reporting")]
    WorkerLost { offset: u32 },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Reel Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Dispatcher, HarvestSummary, PageOutcome};
pub use record::MovieRecord;
pub use storage::{RecordSink, SqliteStorage};
