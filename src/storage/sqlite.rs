//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the FeedStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{FeedStore, StorageResult};
use crate::storage::{FeedRecord, RunRecord, RunStatus};
use crate::ScoutError;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Creates a new SqliteStore instance, opening or creating the database
    /// file at the given path
    pub fn new(path: &Path) -> Result<Self, ScoutError> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, ScoutError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn finish_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        Ok(())
    }
}

impl FeedStore for SqliteStore {
    // ===== Run Management =====

    fn create_run(&mut self, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn complete_run(&mut self, run_id: i64) -> StorageResult<()> {
        self.finish_run(run_id, RunStatus::Completed)
    }

    fn fail_run(&mut self, run_id: i64) -> StorageResult<()> {
        self.finish_run(run_id, RunStatus::Failed)
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, started_at, finished_at, config_hash, status
             FROM runs ORDER BY id DESC LIMIT 1",
        )?;

        let run = stmt
            .query_row([], |row| {
                Ok(RunRecord {
                    id: row.get(0)?,
                    started_at: row.get(1)?,
                    finished_at: row.get(2)?,
                    config_hash: row.get(3)?,
                    status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
                        .unwrap_or(RunStatus::Running),
                })
            })
            .optional()?;

        Ok(run)
    }

    // ===== Identity Cache =====

    fn exists(&self, podcast_id: &str) -> StorageResult<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM feeds WHERE podcast_id = ?1",
                params![podcast_id],
                |row| row.get(0),
            )
            .optional()?;

        Ok(found.is_some())
    }

    fn put_batch(&mut self, records: &[FeedRecord], run_id: i64) -> StorageResult<usize> {
        let now = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO feeds (podcast_id, feed_url, discovered_at, discovered_run)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;

            for record in records {
                inserted += stmt.execute(params![
                    record.podcast_id,
                    record.feed_url,
                    now,
                    run_id
                ])?;
            }
        }

        tx.commit()?;
        Ok(inserted)
    }

    fn get_feed(&self, podcast_id: &str) -> StorageResult<Option<FeedRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT podcast_id, feed_url FROM feeds WHERE podcast_id = ?1",
                params![podcast_id],
                |row| {
                    Ok(FeedRecord {
                        podcast_id: row.get(0)?,
                        feed_url: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    // ===== Statistics =====

    fn count_feeds(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM feeds", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_feeds_for_run(&self, run_id: i64) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM feeds WHERE discovered_run = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
