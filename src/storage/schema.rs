//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the podscout database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Track crawl passes
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL
);

-- Identity cache: every resolved podcast identifier and its feed URL.
-- podcast_id is the dedup key; a row is written once and never mutated.
CREATE TABLE IF NOT EXISTS feeds (
    podcast_id TEXT PRIMARY KEY,
    feed_url TEXT NOT NULL,
    discovered_at TEXT NOT NULL,
    discovered_run INTEGER NOT NULL REFERENCES runs(id)
);

CREATE INDEX IF NOT EXISTS idx_feeds_run ON feeds(discovered_run);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
