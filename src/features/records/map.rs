//! Map records.

use serde::{Deserialize, Serialize};

use super::BestRun;

/// Cumulative statistics for one map.
///
/// Created on first use of a map name, mutated whenever a run finishes,
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapRecord {
    /// Map name as entered by the user (unique).
    pub name: String,
    /// Song played during runs on this map, relative to the music directory.
    pub song: Option<String>,
    /// Attempts across all sessions.
    pub total_attempts: i64,
    /// Completions across all sessions.
    pub total_completions: i64,
    /// Longest survival so far (attempt number is map-cumulative).
    pub best_attempt: Option<BestRun>,
    /// Fastest escape so far (attempt number is map-cumulative).
    pub best_completion: Option<BestRun>,
}

impl MapRecord {
    /// A fresh record for a map that has never been played.
    #[must_use]
    pub fn new(name: &str, song: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            song,
            total_attempts: 0,
            total_completions: 0,
            best_attempt: None,
            best_completion: None,
        }
    }
}
