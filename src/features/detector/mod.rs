//! The run-state detector.
//!
//! A sampling loop captures screen regions, OCRs them, classifies the text
//! against known phrase sets, and drives a small state machine
//! (idle → running → stopped/escaped) while coordinating music playback and
//! statistics persistence.

mod monitor;
mod phrases;
mod state;

pub use monitor::{Watcher, WatchOutcome};
pub use phrases::{PhraseClassifier, StartMatch};
pub use state::{RunDetector, RunEvent};
