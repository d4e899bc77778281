//! Output formatting for floodwatch.
//!
//! Pretty (colored, human) and JSON formatters for records, plus the
//! timestamped watch-loop log written to console and `logs/latest.log`.

mod json;
pub mod log;
mod pretty;

use crate::cli::args::OutputFormat;
use crate::error::FloodwatchError;
use crate::features::records::{MapRecord, SessionRecord};

pub use json::to_json;
pub use pretty::*;

/// Format a list of maps based on output format.
///
/// # Errors
///
/// Returns `FloodwatchError::Parse` if JSON serialization fails.
pub fn format_maps(maps: &[MapRecord], format: OutputFormat) -> Result<String, FloodwatchError> {
    match format {
        OutputFormat::Pretty => Ok(format_maps_pretty(maps)),
        OutputFormat::Json => to_json(&maps),
    }
}

/// Format a single map based on output format.
///
/// # Errors
///
/// Returns `FloodwatchError::Parse` if JSON serialization fails.
pub fn format_map(map: &MapRecord, format: OutputFormat) -> Result<String, FloodwatchError> {
    match format {
        OutputFormat::Pretty => Ok(format_map_pretty(map)),
        OutputFormat::Json => to_json(&map),
    }
}

/// Format a list of sessions based on output format.
///
/// # Errors
///
/// Returns `FloodwatchError::Parse` if JSON serialization fails.
pub fn format_sessions(
    sessions: &[SessionRecord],
    format: OutputFormat,
) -> Result<String, FloodwatchError> {
    match format {
        OutputFormat::Pretty => Ok(format_sessions_pretty(sessions)),
        OutputFormat::Json => to_json(&sessions),
    }
}
