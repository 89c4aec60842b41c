use serde::Deserialize;

/// Main configuration structure for podscout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    pub output: OutputConfig,
    /// Optional category overrides; when empty the builtin directory
    /// category table is used.
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Minimum delay between consecutive outbound requests (milliseconds)
    #[serde(rename = "request-delay-ms", default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User agent string sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

fn default_request_delay_ms() -> u64 {
    100
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("podscout/{}", env!("CARGO_PKG_VERSION"))
}

/// Metadata lookup API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    /// Base URL of the lookup endpoint; the podcast identifier is appended
    /// as an `id` query parameter.
    #[serde(rename = "base-url", default = "default_lookup_url")]
    pub base_url: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: default_lookup_url(),
        }
    }
}

fn default_lookup_url() -> String {
    "https://itunes.apple.com/lookup".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file holding the identity cache
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// A directory category with its listing base URL
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    /// Category name (e.g., "comedy")
    pub name: String,

    /// Listing base URL; letter and page parameters are appended
    pub url: String,
}
