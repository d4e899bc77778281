//! Command-line interface for floodwatch.

pub mod args;
pub mod commands;
