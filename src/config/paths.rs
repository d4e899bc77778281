//! Path resolution for floodwatch configuration and data files.
//!
//! All floodwatch data is stored in `~/.floodwatch/`:
//! - `config.yaml` - Main configuration file
//! - `floodwatch.db` - SQLite database for maps and sessions
//! - `music/` - Background music library
//! - `screenshots/completions/` - Full-screen grabs saved on escape
//! - `logs/` - Watch loop log files
//!
//! The root can be overridden with the `FLOODWATCH_HOME` environment
//! variable, which the integration tests rely on.

use std::path::PathBuf;

use crate::error::FloodwatchError;

/// Paths to floodwatch configuration and data directories.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Root directory: `~/.floodwatch/`
    pub root: PathBuf,
    /// Config file: `~/.floodwatch/config.yaml`
    pub config_file: PathBuf,
    /// Database file: `~/.floodwatch/floodwatch.db`
    pub database: PathBuf,
    /// Music library: `~/.floodwatch/music/`
    pub music: PathBuf,
    /// Completion screenshots: `~/.floodwatch/screenshots/completions/`
    pub completions: PathBuf,
    /// Log directory: `~/.floodwatch/logs/`
    pub logs: PathBuf,
}

impl Paths {
    /// Create paths based on `FLOODWATCH_HOME` or the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if neither `FLOODWATCH_HOME` nor `HOME` is set.
    pub fn new() -> Result<Self, FloodwatchError> {
        if let Ok(root) = std::env::var("FLOODWATCH_HOME") {
            return Ok(Self::with_root(PathBuf::from(root)));
        }

        let home = std::env::var("HOME").map_err(|_| {
            FloodwatchError::Config("Could not determine home directory".to_string())
        })?;

        Ok(Self::with_root(PathBuf::from(home).join(".floodwatch")))
    }

    /// Create paths with a custom root directory (useful for testing).
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self {
            config_file: root.join("config.yaml"),
            database: root.join("floodwatch.db"),
            music: root.join("music"),
            completions: root.join("screenshots").join("completions"),
            logs: root.join("logs"),
            root,
        }
    }

    /// Ensure all directories exist, creating them if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn ensure_dirs(&self) -> Result<(), FloodwatchError> {
        let dirs = [&self.root, &self.music, &self.completions, &self.logs];

        for dir in dirs {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    FloodwatchError::Config(format!("Failed to create directory {:?}: {}", dir, e))
                })?;
            }
        }

        Ok(())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| {
            // Fallback to current directory if home cannot be determined
            Self::with_root(PathBuf::from(".floodwatch"))
        })
    }
}
