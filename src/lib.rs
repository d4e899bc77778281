//! floodwatch - a run companion for Flood Escape 2
//!
//! This crate watches the game on screen via an external screenshot tool and
//! Tesseract OCR, detects run starts, deaths, and escapes from on-screen
//! text, plays background music synchronized to runs, and records per-map
//! and per-session statistics in `SQLite`.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod output;
pub mod screen;
pub mod storage;

pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::FloodwatchError;
