//! Database migrations for floodwatch.
//!
//! Each migration is a function that upgrades the schema by one version.
//! Migrations are run automatically when the database is opened.

use rusqlite::Connection;

use crate::error::FloodwatchError;

/// Current schema version.
const CURRENT_VERSION: i32 = 1;

/// Get the current schema version from the database.
///
/// Returns 0 if no version has been set (new database).
pub fn get_version(conn: &Connection) -> Result<i32, FloodwatchError> {
    let version: i32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| FloodwatchError::Database(format!("Failed to get schema version: {e}")))?;

    Ok(version)
}

/// Set the schema version in the database.
fn set_version(conn: &Connection, version: i32) -> Result<(), FloodwatchError> {
    conn.execute_batch(&format!("PRAGMA user_version = {version};"))
        .map_err(|e| FloodwatchError::Database(format!("Failed to set schema version: {e}")))
}

/// Run all pending migrations.
pub fn run(conn: &Connection) -> Result<(), FloodwatchError> {
    let current = get_version(conn)?;

    if current >= CURRENT_VERSION {
        return Ok(());
    }

    for version in (current + 1)..=CURRENT_VERSION {
        run_migration(conn, version)?;
        set_version(conn, version)?;
    }

    Ok(())
}

/// Run a specific migration.
fn run_migration(conn: &Connection, version: i32) -> Result<(), FloodwatchError> {
    match version {
        1 => migrate_v1(conn),
        _ => Err(FloodwatchError::Database(format!(
            "Unknown migration version: {version}"
        ))),
    }
}

/// Migration v1: Initial schema.
///
/// Creates tables for:
/// - `maps`: one row per map, cumulative statistics and best runs
/// - `sessions`: one row per watch, session-scoped statistics
///
/// Best runs are nullable column pairs; NULL means no best recorded yet.
fn migrate_v1(conn: &Connection) -> Result<(), FloodwatchError> {
    conn.execute_batch(
        r"
        -- Map records
        CREATE TABLE IF NOT EXISTS maps (
            name TEXT PRIMARY KEY,
            song TEXT,
            total_attempts INTEGER NOT NULL DEFAULT 0,
            total_completions INTEGER NOT NULL DEFAULT 0,
            best_attempt_no INTEGER,
            best_attempt_secs REAL,
            best_completion_no INTEGER,
            best_completion_secs REAL
        );

        -- Watch sessions
        CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            map TEXT NOT NULL REFERENCES maps(name),
            started_at TEXT NOT NULL,
            ended_at TEXT,
            attempts INTEGER NOT NULL DEFAULT 0,
            completions INTEGER NOT NULL DEFAULT 0,
            best_attempt_no INTEGER,
            best_attempt_secs REAL,
            best_completion_no INTEGER,
            best_completion_secs REAL
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_map
        ON sessions(map);

        CREATE INDEX IF NOT EXISTS idx_sessions_started
        ON sessions(started_at);
        ",
    )
    .map_err(|e| FloodwatchError::Database(format!("Migration v1 failed: {e}")))
}
