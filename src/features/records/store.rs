//! Record persistence.
//!
//! One store over both tables; the watch loop updates maps and the open
//! session together, so they share a connection.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};

use crate::error::FloodwatchError;
use crate::storage::Database;

use super::{BestRun, MapRecord, SessionRecord};

/// Storage for map and session records.
pub struct RecordStore {
    db: Database,
}

impl RecordStore {
    /// Create a store over the default database.
    pub fn new() -> Result<Self, FloodwatchError> {
        let db = Database::open()?;
        Ok(Self { db })
    }

    /// Create a store with an existing database connection.
    #[must_use]
    pub const fn with_database(db: Database) -> Self {
        Self { db }
    }

    // --- maps ---

    /// Fetch a map by name, creating a blank record on first use.
    pub fn ensure_map(&self, name: &str, song: Option<&str>) -> Result<MapRecord, FloodwatchError> {
        if let Some(map) = self.get_map(name)? {
            return Ok(map);
        }

        let conn = self.db.connection();
        conn.execute(
            "INSERT INTO maps (name, song) VALUES (?1, ?2)",
            params![name, song],
        )
        .map_err(|e| FloodwatchError::Database(format!("Failed to insert map: {e}")))?;

        Ok(MapRecord::new(name, song.map(String::from)))
    }

    /// Fetch a map by name.
    pub fn get_map(&self, name: &str) -> Result<Option<MapRecord>, FloodwatchError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT name, song, total_attempts, total_completions,
                         best_attempt_no, best_attempt_secs,
                         best_completion_no, best_completion_secs
                  FROM maps WHERE name = ?1",
            )
            .map_err(|e| FloodwatchError::Database(format!("Failed to prepare query: {e}")))?;

        stmt.query_row([name], row_to_map)
            .optional()
            .map_err(|e| FloodwatchError::Database(format!("Failed to query map: {e}")))
    }

    /// List all maps, alphabetically.
    pub fn list_maps(&self) -> Result<Vec<MapRecord>, FloodwatchError> {
        let conn = self.db.connection();

        let mut stmt = conn
            .prepare(
                r"SELECT name, song, total_attempts, total_completions,
                         best_attempt_no, best_attempt_secs,
                         best_completion_no, best_completion_secs
                  FROM maps ORDER BY name COLLATE NOCASE",
            )
            .map_err(|e| FloodwatchError::Database(format!("Failed to prepare query: {e}")))?;

        let rows = stmt
            .query_map([], row_to_map)
            .map_err(|e| FloodwatchError::Database(format!("Failed to query maps: {e}")))?;

        let mut maps = Vec::new();
        for row in rows {
            maps.push(row.map_err(|e| FloodwatchError::Database(e.to_string()))?);
        }

        Ok(maps)
    }

    /// Set or clear a map's song.
    pub fn set_song(&self, name: &str, song: Option<&str>) -> Result<(), FloodwatchError> {
        let rows = self
            .db
            .connection()
            .execute(
                "UPDATE maps SET song = ?1 WHERE name = ?2",
                params![song, name],
            )
            .map_err(|e| FloodwatchError::Database(format!("Failed to set song: {e}")))?;

        if rows == 0 {
            return Err(FloodwatchError::NotFound(format!("map '{name}'")));
        }
        Ok(())
    }

    /// Count one more attempt against a map.
    pub fn add_map_attempt(&self, name: &str) -> Result<(), FloodwatchError> {
        self.db
            .connection()
            .execute(
                "UPDATE maps SET total_attempts = total_attempts + 1 WHERE name = ?1",
                [name],
            )
            .map_err(|e| FloodwatchError::Database(format!("Failed to count attempt: {e}")))?;
        Ok(())
    }

    /// Count one more completion against a map.
    pub fn add_map_completion(&self, name: &str) -> Result<(), FloodwatchError> {
        self.db
            .connection()
            .execute(
                "UPDATE maps SET total_completions = total_completions + 1 WHERE name = ?1",
                [name],
            )
            .map_err(|e| FloodwatchError::Database(format!("Failed to count completion: {e}")))?;
        Ok(())
    }

    /// Record a new map best attempt.
    pub fn set_map_best_attempt(&self, name: &str, best: &BestRun) -> Result<(), FloodwatchError> {
        self.db
            .connection()
            .execute(
                "UPDATE maps SET best_attempt_no = ?1, best_attempt_secs = ?2 WHERE name = ?3",
                params![best.attempt, best.seconds, name],
            )
            .map_err(|e| FloodwatchError::Database(format!("Failed to set best attempt: {e}")))?;
        Ok(())
    }

    /// Record a new map best completion.
    pub fn set_map_best_completion(
        &self,
        name: &str,
        best: &BestRun,
    ) -> Result<(), FloodwatchError> {
        self.db
            .connection()
            .execute(
                "UPDATE maps SET best_completion_no = ?1, best_completion_secs = ?2 WHERE name = ?3",
                params![best.attempt, best.seconds, name],
            )
            .map_err(|e| FloodwatchError::Database(format!("Failed to set best completion: {e}")))?;
        Ok(())
    }

    // --- sessions ---

    /// Insert a session row, filling in its database ID.
    pub fn open_session(&self, session: &mut SessionRecord) -> Result<(), FloodwatchError> {
        let conn = self.db.connection();

        conn.execute(
            r"INSERT INTO sessions (map, started_at, attempts, completions)
              VALUES (?1, ?2, ?3, ?4)",
            params![
                session.map,
                session.started_at.to_rfc3339(),
                session.attempts,
                session.completions,
            ],
        )
        .map_err(|e| FloodwatchError::Database(format!("Failed to insert session: {e}")))?;

        session.id = Some(conn.last_insert_rowid());
        Ok(())
    }

    /// Update a session's attempt/completion totals.
    pub fn update_session_totals(
        &self,
        id: i64,
        attempts: i64,
        completions: i64,
    ) -> Result<(), FloodwatchError> {
        self.db
            .connection()
            .execute(
                "UPDATE sessions SET attempts = ?1, completions = ?2 WHERE id = ?3",
                params![attempts, completions, id],
            )
            .map_err(|e| FloodwatchError::Database(format!("Failed to update totals: {e}")))?;
        Ok(())
    }

    /// Record a new session best attempt.
    pub fn set_session_best_attempt(&self, id: i64, best: &BestRun) -> Result<(), FloodwatchError> {
        self.db
            .connection()
            .execute(
                "UPDATE sessions SET best_attempt_no = ?1, best_attempt_secs = ?2 WHERE id = ?3",
                params![best.attempt, best.seconds, id],
            )
            .map_err(|e| FloodwatchError::Database(format!("Failed to set best attempt: {e}")))?;
        Ok(())
    }

    /// Record a new session best completion.
    pub fn set_session_best_completion(
        &self,
        id: i64,
        best: &BestRun,
    ) -> Result<(), FloodwatchError> {
        self.db
            .connection()
            .execute(
                "UPDATE sessions SET best_completion_no = ?1, best_completion_secs = ?2
                 WHERE id = ?3",
                params![best.attempt, best.seconds, id],
            )
            .map_err(|e| FloodwatchError::Database(format!("Failed to set best completion: {e}")))?;
        Ok(())
    }

    /// Close a session.
    pub fn close_session(
        &self,
        id: i64,
        ended_at: DateTime<Utc>,
    ) -> Result<(), FloodwatchError> {
        self.db
            .connection()
            .execute(
                "UPDATE sessions SET ended_at = ?1 WHERE id = ?2",
                params![ended_at.to_rfc3339(), id],
            )
            .map_err(|e| FloodwatchError::Database(format!("Failed to close session: {e}")))?;
        Ok(())
    }

    /// List recent sessions, newest first, optionally filtered by map.
    pub fn list_sessions(
        &self,
        map: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SessionRecord>, FloodwatchError> {
        let conn = self.db.connection();

        let base = r"SELECT id, map, started_at, ended_at, attempts, completions,
                            best_attempt_no, best_attempt_secs,
                            best_completion_no, best_completion_secs
                     FROM sessions";

        let mut sessions = Vec::new();
        if let Some(map) = map {
            let mut stmt = conn
                .prepare(&format!(
                    "{base} WHERE map = ?1 ORDER BY started_at DESC LIMIT ?2"
                ))
                .map_err(|e| FloodwatchError::Database(format!("Failed to prepare query: {e}")))?;
            let rows = stmt
                .query_map(params![map, limit], row_to_session)
                .map_err(|e| FloodwatchError::Database(format!("Failed to query sessions: {e}")))?;
            for row in rows {
                sessions.push(row.map_err(|e| FloodwatchError::Database(e.to_string()))?);
            }
        } else {
            let mut stmt = conn
                .prepare(&format!("{base} ORDER BY started_at DESC LIMIT ?1"))
                .map_err(|e| FloodwatchError::Database(format!("Failed to prepare query: {e}")))?;
            let rows = stmt
                .query_map([limit], row_to_session)
                .map_err(|e| FloodwatchError::Database(format!("Failed to query sessions: {e}")))?;
            for row in rows {
                sessions.push(row.map_err(|e| FloodwatchError::Database(e.to_string()))?);
            }
        }

        Ok(sessions)
    }
}

/// Convert a database row to a `MapRecord`.
fn row_to_map(row: &Row<'_>) -> Result<MapRecord, rusqlite::Error> {
    Ok(MapRecord {
        name: row.get(0)?,
        song: row.get(1)?,
        total_attempts: row.get(2)?,
        total_completions: row.get(3)?,
        best_attempt: best_from_columns(row.get(4)?, row.get(5)?),
        best_completion: best_from_columns(row.get(6)?, row.get(7)?),
    })
}

/// Convert a database row to a `SessionRecord`.
fn row_to_session(row: &Row<'_>) -> Result<SessionRecord, rusqlite::Error> {
    let started_at_str: String = row.get(2)?;
    let ended_at_str: Option<String> = row.get(3)?;

    let started_at = DateTime::parse_from_rfc3339(&started_at_str)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    let ended_at = ended_at_str.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|t| t.with_timezone(&Utc))
            .ok()
    });

    Ok(SessionRecord {
        id: Some(row.get(0)?),
        map: row.get(1)?,
        started_at,
        ended_at,
        attempts: row.get(4)?,
        completions: row.get(5)?,
        best_attempt: best_from_columns(row.get(6)?, row.get(7)?),
        best_completion: best_from_columns(row.get(8)?, row.get(9)?),
    })
}

/// Assemble a best run from its nullable column pair.
fn best_from_columns(attempt: Option<i64>, seconds: Option<f64>) -> Option<BestRun> {
    match (attempt, seconds) {
        (Some(attempt), Some(seconds)) => Some(BestRun { attempt, seconds }),
        _ => None,
    }
}
