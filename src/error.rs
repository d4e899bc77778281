//! Error types for floodwatch.

use thiserror::Error;

/// All errors that floodwatch can produce.
#[derive(Debug, Error)]
pub enum FloodwatchError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Configuration problem (missing home, unreadable config, bad value).
    #[error("config error: {0}")]
    Config(String),

    /// Screen capture failed.
    #[error("capture error: {0}")]
    Capture(String),

    /// The OCR engine failed or produced unreadable output.
    #[error("ocr error: {0}")]
    Ocr(String),

    /// Audio device or decoding failure.
    #[error("audio error: {0}")]
    Audio(String),

    /// JSON serialization/deserialization failed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Invalid interactive input that could not be recovered.
    #[error("input error: {0}")]
    Input(String),

    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FloodwatchError::Database("no such table: maps".to_string());
        assert_eq!(err.to_string(), "database error: no such table: maps");

        let err = FloodwatchError::NotFound("map 'Abandoned Facility'".to_string());
        assert!(err.to_string().contains("Abandoned Facility"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: FloodwatchError = io.into();
        assert!(matches!(err, FloodwatchError::Io(_)));
    }
}
