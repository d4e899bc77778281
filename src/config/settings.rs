//! Configuration settings for floodwatch.
//!
//! Settings are loaded from `~/.floodwatch/config.yaml`. A missing file
//! yields the defaults, which match a 1920x1080 game window.

use serde::{Deserialize, Serialize};

use crate::config::Paths;
use crate::error::FloodwatchError;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Screen capture settings.
    pub screen: ScreenConfig,
    /// Run-state detector settings.
    pub detector: DetectorConfig,
    /// Music playback settings.
    pub music: MusicConfig,
}

/// A rectangular screen region to capture, in physical pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRegion {
    /// Label used in logs.
    pub name: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Screen capture settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Regions of the game window that carry run-state text.
    #[serde(default = "default_regions")]
    pub regions: Vec<CaptureRegion>,
    /// Override for the screenshot command. `{path}` is replaced with the
    /// output file. When unset a per-platform default is used.
    #[serde(default)]
    pub capture_command: Option<String>,
    /// Override for the tesseract executable path.
    #[serde(default)]
    pub tesseract_command: Option<String>,
}

/// Run-state detector settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Phrases that mark a run start.
    #[serde(default = "default_start_phrases")]
    pub start_phrases: Vec<String>,
    /// Phrases that mark a run stop (death / lobby).
    #[serde(default = "default_stop_phrases")]
    pub stop_phrases: Vec<String>,
    /// Countdown phrases matched with fuzzy tolerance.
    #[serde(default = "default_countdown_phrases")]
    pub countdown_phrases: Vec<String>,
    /// Maximum Damerau-Levenshtein distance for countdown matches.
    #[serde(default = "default_max_distance")]
    pub max_distance: usize,
    /// Delay between sampling ticks in milliseconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Pause before starting music when a countdown phrase matched, so the
    /// music lines up with the actual run start.
    #[serde(default = "default_countdown_pause")]
    pub countdown_pause_ms: u64,
}

/// Music playback settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    /// Default volume on the 0-100 prompt scale.
    #[serde(default = "default_volume")]
    pub default_volume: u8,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns defaults if the config file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, FloodwatchError> {
        let paths = Paths::new()?;
        Self::load_from(&paths)
    }

    /// Load configuration from a specific set of paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(paths: &Paths) -> Result<Self, FloodwatchError> {
        if !paths.config_file.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&paths.config_file).map_err(|e| {
            FloodwatchError::Config(format!(
                "Failed to read {}: {e}",
                paths.config_file.display()
            ))
        })?;

        serde_yaml::from_str(&contents)
            .map_err(|e| FloodwatchError::Config(format!("Invalid config: {e}")))
    }

    /// Save configuration to a specific set of paths.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_to(&self, paths: &Paths) -> Result<(), FloodwatchError> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| FloodwatchError::Config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(&paths.config_file, yaml).map_err(|e| {
            FloodwatchError::Config(format!(
                "Failed to write {}: {e}",
                paths.config_file.display()
            ))
        })
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            regions: default_regions(),
            capture_command: None,
            tesseract_command: None,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            start_phrases: default_start_phrases(),
            stop_phrases: default_stop_phrases(),
            countdown_phrases: default_countdown_phrases(),
            max_distance: default_max_distance(),
            poll_interval_ms: default_poll_interval(),
            countdown_pause_ms: default_countdown_pause(),
        }
    }
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            default_volume: default_volume(),
        }
    }
}

// Default value functions for serde

fn default_regions() -> Vec<CaptureRegion> {
    vec![
        CaptureRegion {
            name: "ready".to_string(),
            x: 320,
            y: 850,
            width: 680,
            height: 150,
        },
        CaptureRegion {
            name: "notifications".to_string(),
            x: 600,
            y: 0,
            width: 700,
            height: 300,
        },
        CaptureRegion {
            name: "rescue".to_string(),
            x: 700,
            y: 870,
            width: 550,
            height: 120,
        },
    ]
}

fn default_start_phrases() -> Vec<String> {
    vec!["get ready: ".to_string(), "rescue".to_string()]
}

fn default_stop_phrases() -> Vec<String> {
    vec![
        "round".to_string(),
        "join".to_string(),
        "next".to_string(),
        "drowned".to_string(),
    ]
}

fn default_countdown_phrases() -> Vec<String> {
    vec![
        "get ready: 3".to_string(),
        "get ready: 2".to_string(),
        "get ready: 1".to_string(),
    ]
}

const fn default_max_distance() -> usize {
    3
}

const fn default_poll_interval() -> u64 {
    250
}

const fn default_countdown_pause() -> u64 {
    1200
}

const fn default_volume() -> u8 {
    35
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.screen.regions.len(), 3);
        assert_eq!(config.detector.start_phrases, vec!["get ready: ", "rescue"]);
        assert_eq!(config.detector.max_distance, 3);
        assert_eq!(config.music.default_volume, 35);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().to_path_buf());

        let config = Config::load_from(&paths).unwrap();
        assert_eq!(config.detector.poll_interval_ms, 250);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let paths = Paths::with_root(temp_dir.path().to_path_buf());
        paths.ensure_dirs().unwrap();

        let mut config = Config::default();
        config.detector.max_distance = 2;
        config.music.default_volume = 50;
        config.save_to(&paths).unwrap();

        let loaded = Config::load_from(&paths).unwrap();
        assert_eq!(loaded.detector.max_distance, 2);
        assert_eq!(loaded.music.default_volume, 50);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "detector:\n  max_distance: 1\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.detector.max_distance, 1);
        // Unspecified fields fall back to defaults
        assert_eq!(config.detector.poll_interval_ms, 250);
        assert_eq!(config.screen.regions.len(), 3);
    }
}
