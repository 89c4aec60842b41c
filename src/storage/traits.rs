//! Storage traits and error types

use crate::storage::{FeedRecord, RunRecord};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for identity cache backends
///
/// The cache is the only state that survives process restarts. Its contract
/// is what makes repeated passes over the full directory cheap: once an
/// identifier is present it is never re-resolved in a later run.
pub trait FeedStore {
    // ===== Run Management =====

    /// Creates a new crawl pass record, returning its ID
    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64>;

    /// Marks a run as completed with a finish timestamp
    fn complete_run(&mut self, run_id: i64) -> StorageResult<()>;

    /// Marks a run as failed with a finish timestamp
    fn fail_run(&mut self, run_id: i64) -> StorageResult<()>;

    /// Gets the most recent run
    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>>;

    // ===== Identity Cache =====

    /// True iff a feed record for this identifier has previously been
    /// persisted, in this or any prior run
    fn exists(&self, podcast_id: &str) -> StorageResult<bool>;

    /// Persists a batch of newly resolved feed records
    ///
    /// Duplicate identifiers within or across batches are idempotent: the
    /// second insert of an identifier is a no-op, not an error. Returns the
    /// number of records actually inserted.
    fn put_batch(&mut self, records: &[FeedRecord], run_id: i64) -> StorageResult<usize>;

    /// Gets the cached feed record for an identifier, if any
    fn get_feed(&self, podcast_id: &str) -> StorageResult<Option<FeedRecord>>;

    // ===== Statistics =====

    /// Total number of cached feed records
    fn count_feeds(&self) -> StorageResult<u64>;

    /// Number of feed records discovered by a specific run
    fn count_feeds_for_run(&self, run_id: i64) -> StorageResult<u64>;
}
