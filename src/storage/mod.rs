//! Storage module for the persistent identity cache
//!
//! This module handles all database operations for the crawler, including:
//! - SQLite database initialization and schema management
//! - Feed record persistence and existence checks
//! - Crawl pass (run) tracking

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{FeedStore, StorageError, StorageResult};

use crate::ScoutError;
use std::path::Path;

/// Initializes or opens a storage database
pub fn open_storage(path: &Path) -> Result<SqliteStore, ScoutError> {
    SqliteStore::new(path)
}

/// A resolved pairing of a podcast identifier and its syndication feed URL
///
/// Created by the resolver after a successful metadata lookup; owned
/// thereafter by the identity cache and never mutated once stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRecord {
    /// Numeric identifier extracted from a listing anchor
    pub podcast_id: String,

    /// Canonical syndication feed URL from the metadata lookup
    pub feed_url: String,
}

/// Represents one crawl pass
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub config_hash: String,
    pub status: RunStatus,
}

/// Status of a crawl pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}
