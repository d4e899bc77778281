//! Tesseract OCR invocation.
//!
//! Runs the `tesseract` binary on a temporary PNG and reads the recognized
//! text from stdout. Page segmentation mode 6 (single uniform block) works
//! best on the stitched region canvas.

use std::process::Command;

use image::RgbImage;
use tempfile::NamedTempFile;

use crate::error::FloodwatchError;

use super::TextRecognizer;

/// OCR engine backed by the Tesseract command-line binary.
pub struct TesseractOcr {
    command: String,
}

impl TesseractOcr {
    /// Create an engine, using `override_command` or plain `tesseract`.
    #[must_use]
    pub fn new(override_command: Option<&str>) -> Self {
        Self {
            command: override_command.unwrap_or("tesseract").to_string(),
        }
    }
}

impl TextRecognizer for TesseractOcr {
    fn recognize(&self, image: &RgbImage) -> Result<String, FloodwatchError> {
        let input = NamedTempFile::with_suffix(".png")
            .map_err(|e| FloodwatchError::Ocr(format!("Failed to create temp file: {e}")))?;
        image
            .save(input.path())
            .map_err(|e| FloodwatchError::Ocr(format!("Failed to write OCR input: {e}")))?;

        let output = Command::new(&self.command)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg("eng")
            .arg("--psm")
            .arg("6")
            .output()
            .map_err(|e| {
                FloodwatchError::Ocr(format!(
                    "Failed to run '{}' (is Tesseract installed?): {e}",
                    self.command
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FloodwatchError::Ocr(format!(
                "Tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let ocr = TesseractOcr::new(None);
        assert_eq!(ocr.command, "tesseract");
    }

    #[test]
    fn test_missing_binary_is_an_ocr_error() {
        let ocr = TesseractOcr::new(Some("definitely-not-a-tesseract-binary"));
        let image = RgbImage::from_pixel(10, 10, image::Rgb([0, 0, 0]));

        let err = ocr.recognize(&image).unwrap_err();
        assert!(matches!(err, FloodwatchError::Ocr(_)));
    }
}
