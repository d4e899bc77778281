//! Shared helpers used across floodwatch features.

pub mod matching;
pub mod slug;
