//! Kete: an offline archiver for the Work and Income MAP website
//!
//! This crate crawls a site breadth-first, mirrors its HTML pages and PDFs
//! to disk, extracts text from the downloaded PDFs, and decides from a
//! persisted timestamp when the archive needs refreshing.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod state;
pub mod store;
pub mod update;
pub mod url;

use thiserror::Error;

/// Main error type for Kete operations
#[derive(Debug, Error)]
pub enum KeteError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Failed to fetch navigation page {url}: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background update task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
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

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Kete operations
pub type Result<T> = std::result::Result<T, KeteError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlReport, SiteArchiver};
pub use extract::{ExtractedText, TextExtractor};
pub use store::ArchiveStore;
pub use update::{UpdateOutcome, Updater};
pub use url::{CrawlTarget, ScopeRule};
