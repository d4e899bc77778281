//! The run state machine.
//!
//! Two states: idle (between runs) and running. Start signals are ignored
//! while running; stop and escape signals are ignored while idle. Attempt
//! numbers are session-scoped and increase by one per started run.

use std::time::Instant;

/// An observed run transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunEvent {
    /// A run started.
    Started {
        /// Session-scoped attempt number (1-based).
        attempt: i64,
    },
    /// A run ended without an escape.
    Stopped {
        attempt: i64,
        /// Run length in seconds.
        seconds: f64,
    },
    /// The player escaped the map.
    Escaped {
        attempt: i64,
        seconds: f64,
    },
}

/// Tracks run state across sampling ticks.
#[derive(Debug)]
pub struct RunDetector {
    running_since: Option<Instant>,
    attempts: i64,
    completions: i64,
}

impl RunDetector {
    /// A detector in the idle state with no runs observed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            running_since: None,
            attempts: 0,
            completions: 0,
        }
    }

    /// Whether a run is in progress.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Runs started so far this session.
    #[must_use]
    pub const fn attempts(&self) -> i64 {
        self.attempts
    }

    /// Escapes so far this session.
    #[must_use]
    pub const fn completions(&self) -> i64 {
        self.completions
    }

    /// Signal a run start. Ignored while a run is in progress.
    pub fn start(&mut self) -> Option<RunEvent> {
        if self.running_since.is_some() {
            return None;
        }

        self.running_since = Some(Instant::now());
        self.attempts += 1;
        Some(RunEvent::Started {
            attempt: self.attempts,
        })
    }

    /// Signal a run stop. Ignored while idle.
    pub fn stop(&mut self) -> Option<RunEvent> {
        let started = self.running_since.take()?;
        Some(RunEvent::Stopped {
            attempt: self.attempts,
            seconds: round_millis(started.elapsed().as_secs_f64()),
        })
    }

    /// Signal an escape. Ignored while idle.
    pub fn escape(&mut self) -> Option<RunEvent> {
        let started = self.running_since.take()?;
        self.completions += 1;
        Some(RunEvent::Escaped {
            attempt: self.attempts,
            seconds: round_millis(started.elapsed().as_secs_f64()),
        })
    }
}

impl Default for RunDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to millisecond precision for storage and display.
fn round_millis(seconds: f64) -> f64 {
    (seconds * 1000.0).round() / 1000.0
}
