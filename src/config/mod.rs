//! Configuration management for floodwatch.
//!
//! This module handles loading and saving configuration from `~/.floodwatch/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{CaptureRegion, Config, DetectorConfig, MusicConfig, ScreenConfig};
