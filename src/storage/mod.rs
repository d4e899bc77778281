//! Storage layer for floodwatch.
//!
//! This module provides SQLite-based persistence for:
//! - Map statistics (cumulative attempts/completions, best runs)
//! - Session history (one row per program execution)

mod database;
mod migrations;

pub use database::Database;
