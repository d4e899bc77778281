//! Watch session records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BestRun;

/// One program execution watching one map.
///
/// Opened when the watch starts, closed when it ends. Totals and bests
/// cover only the runs observed during this execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Database ID (None if not persisted).
    pub id: Option<i64>,
    /// Name of the map being watched.
    pub map: String,
    /// When the watch started.
    pub started_at: DateTime<Utc>,
    /// When the watch ended (None while open).
    pub ended_at: Option<DateTime<Utc>>,
    /// Runs started during this session.
    pub attempts: i64,
    /// Escapes during this session.
    pub completions: i64,
    /// Longest survival this session (attempt number is session-scoped).
    pub best_attempt: Option<BestRun>,
    /// Fastest escape this session (attempt number is session-scoped).
    pub best_completion: Option<BestRun>,
}

impl SessionRecord {
    /// Open a new session for `map`, starting now.
    #[must_use]
    pub fn open(map: &str) -> Self {
        Self {
            id: None,
            map: map.to_string(),
            started_at: Utc::now(),
            ended_at: None,
            attempts: 0,
            completions: 0,
            best_attempt: None,
            best_completion: None,
        }
    }

    /// Mark the session as ended now.
    pub fn close(&mut self) {
        self.ended_at = Some(Utc::now());
    }

    /// Whether the session is still open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Session duration in whole seconds (up to now while open).
    #[must_use]
    pub fn duration_secs(&self) -> i64 {
        let end = self.ended_at.unwrap_or_else(Utc::now);
        end.signed_duration_since(self.started_at).num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_session() {
        let session = SessionRecord::open("Lost Woods");

        assert_eq!(session.map, "Lost Woods");
        assert!(session.is_open());
        assert_eq!(session.attempts, 0);
        assert_eq!(session.completions, 0);
    }

    #[test]
    fn test_close_session() {
        let mut session = SessionRecord::open("Lost Woods");
        session.close();

        assert!(!session.is_open());
        assert!(session.duration_secs() >= 0);
    }
}
