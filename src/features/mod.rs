//! Feature modules for floodwatch.

pub mod detector;
pub mod interactive;
pub mod music;
pub mod records;
