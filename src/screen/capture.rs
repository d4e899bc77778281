//! Screen capture via an external screenshot tool.
//!
//! The capture command is configurable (`screen.capture_command`, with
//! `{path}` as the output-file placeholder) and defaults to the platform's
//! stock tool. Region crops are cut from one full-screen frame per tick
//! rather than shelling out once per region.

use std::process::Command;

use image::{imageops, RgbImage, RgbaImage};
use tempfile::NamedTempFile;

use crate::config::CaptureRegion;
use crate::error::FloodwatchError;

use super::ScreenSource;

/// Padding around the stitched region crops, in pixels.
///
/// Tesseract reads text near image borders poorly; the generous margin and
/// inter-region spacing keep each region's text isolated.
const CANVAS_PADDING: u32 = 600;

/// Screen source that shells out to a screenshot command.
pub struct CommandScreenSource {
    command: Vec<String>,
}

impl CommandScreenSource {
    /// Create a screen source from an optional command override.
    ///
    /// # Errors
    ///
    /// Returns an error if no override is given and the platform has no
    /// default screenshot tool.
    pub fn new(override_command: Option<&str>) -> Result<Self, FloodwatchError> {
        let template = match override_command {
            Some(cmd) => cmd.to_string(),
            None => default_capture_command()
                .ok_or_else(|| {
                    FloodwatchError::Config(
                        "No default screenshot tool for this platform; \
                         set screen.capture_command in config.yaml"
                            .to_string(),
                    )
                })?
                .to_string(),
        };

        let command: Vec<String> = template.split_whitespace().map(String::from).collect();
        if command.is_empty() {
            return Err(FloodwatchError::Config(
                "screen.capture_command is empty".to_string(),
            ));
        }

        Ok(Self { command })
    }
}

impl ScreenSource for CommandScreenSource {
    fn frame(&self) -> Result<RgbaImage, FloodwatchError> {
        let output_file = NamedTempFile::with_suffix(".png")
            .map_err(|e| FloodwatchError::Capture(format!("Failed to create temp file: {e}")))?;
        let output_path = output_file.path().to_string_lossy().to_string();

        let args: Vec<String> = self.command[1..]
            .iter()
            .map(|arg| arg.replace("{path}", &output_path))
            .collect();

        let result = Command::new(&self.command[0])
            .args(&args)
            .output()
            .map_err(|e| {
                FloodwatchError::Capture(format!(
                    "Failed to run screenshot tool '{}': {e}",
                    self.command[0]
                ))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(FloodwatchError::Capture(format!(
                "Screenshot tool exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        let frame = image::open(output_file.path())
            .map_err(|e| FloodwatchError::Capture(format!("Failed to decode screenshot: {e}")))?;

        Ok(frame.to_rgba8())
    }
}

/// The platform's stock screenshot command, if it has one.
fn default_capture_command() -> Option<&'static str> {
    if cfg!(target_os = "macos") {
        Some("screencapture -x -t png {path}")
    } else if cfg!(target_os = "linux") {
        Some("scrot -o {path}")
    } else {
        None
    }
}

/// Crop a region out of a frame, clamped to the frame bounds.
fn crop_region(frame: &RgbaImage, region: &CaptureRegion) -> RgbaImage {
    let x = region.x.min(frame.width().saturating_sub(1));
    let y = region.y.min(frame.height().saturating_sub(1));
    let width = region.width.min(frame.width() - x);
    let height = region.height.min(frame.height() - y);

    imageops::crop_imm(frame, x, y, width, height).to_image()
}

/// Stitch the configured region crops onto a single padded canvas.
///
/// Crops are stacked vertically, centered inside a margin of
/// [`CANVAS_PADDING`] pixels, so one OCR pass covers every region.
#[must_use]
pub fn composite(frame: &RgbaImage, regions: &[CaptureRegion]) -> RgbImage {
    let crops: Vec<RgbaImage> = regions.iter().map(|r| crop_region(frame, r)).collect();

    let max_width = crops.iter().map(RgbaImage::width).max().unwrap_or(0);
    let total_height: u32 = crops.iter().map(RgbaImage::height).sum();

    let canvas_width = max_width + CANVAS_PADDING;
    let canvas_height = total_height + CANVAS_PADDING;
    let mut canvas = RgbaImage::from_pixel(canvas_width, canvas_height, image::Rgba([0, 0, 0, 255]));

    let x_offset = i64::from(CANVAS_PADDING / 2);
    let mut y_offset = i64::from(CANVAS_PADDING / 2);
    for crop in &crops {
        imageops::replace(&mut canvas, crop, x_offset, y_offset);
        y_offset += i64::from(crop.height());
    }

    image::DynamicImage::ImageRgba8(canvas).to_rgb8()
}
