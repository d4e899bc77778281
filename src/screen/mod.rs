//! Clients for the external collaborators floodwatch observes the game
//! through: a platform screenshot tool and the Tesseract OCR engine.
//!
//! Both are invoked as subprocesses and sit behind traits so the detector
//! can be tested without a screen or an OCR install.

mod capture;
mod ocr;

use image::{RgbImage, RgbaImage};

use crate::error::FloodwatchError;

pub use capture::{composite, CommandScreenSource};
pub use ocr::TesseractOcr;

/// Source of full-screen frames.
#[cfg_attr(test, mockall::automock)]
pub trait ScreenSource {
    /// Grab the current screen contents.
    ///
    /// # Errors
    ///
    /// Returns an error if the capture tool fails or its output cannot be
    /// decoded.
    fn frame(&self) -> Result<RgbaImage, FloodwatchError>;
}

/// Text recognition over a captured image.
#[cfg_attr(test, mockall::automock)]
pub trait TextRecognizer {
    /// Extract raw text from the image.
    ///
    /// # Errors
    ///
    /// Returns an error if the OCR engine fails.
    fn recognize(&self, image: &RgbImage) -> Result<String, FloodwatchError>;
}
