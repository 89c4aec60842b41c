//! Podscout: a podcast directory feed discovery crawler
//!
//! This crate crawls a podcast directory site organized by category, letter,
//! and page, resolves each discovered podcast identifier against a metadata
//! lookup API, and persists newly found feed URLs. A durable identity cache
//! keeps repeated passes cheap by never re-resolving known identifiers.

pub mod config;
pub mod crawler;
pub mod storage;

use thiserror::Error;

/// Main error type for podscout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Listing page unavailable: {url} returned status {status}")]
    ListingUnavailable { url: String, status: u16 },

    #[error("Structural parse failure for {url}: {message}")]
    StructuralParse { url: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScoutError {
    /// True for failures that indicate the directory site's markup no longer
    /// matches what the resolver expects. These must be surfaced distinctly
    /// rather than absorbed as routine skips.
    pub fn is_structural(&self) -> bool {
        matches!(self, ScoutError::StructuralParse { .. })
    }
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

/// Result type alias for podscout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Category, FetchOutcome, Fetcher, ListingPageRef};
pub use storage::{FeedRecord, FeedStore, SqliteStore};
