//! Best-run records and their comparison rules.

use serde::{Deserialize, Serialize};

/// A recorded best run: which attempt it was and how long it lasted.
///
/// The same shape serves two orderings:
/// - best *attempt*: the longest survival so far (higher seconds wins)
/// - best *completion*: the fastest escape so far (lower seconds wins)
///
/// "No best yet" is represented as `Option::None`, never as a sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestRun {
    /// Attempt number (session-scoped or map-cumulative, per owner).
    pub attempt: i64,
    /// Elapsed run time in seconds.
    pub seconds: f64,
}

impl BestRun {
    /// Whether this run beats `current` as a best attempt.
    ///
    /// Longer survival wins; any run beats no record.
    #[must_use]
    pub fn improves_attempt(&self, current: Option<&Self>) -> bool {
        current.map_or(true, |best| self.seconds > best.seconds)
    }

    /// Whether this run beats `current` as a best completion.
    ///
    /// Faster escape wins; any completion beats no record.
    #[must_use]
    pub fn improves_completion(&self, current: Option<&Self>) -> bool {
        current.map_or(true, |best| self.seconds < best.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn run(attempt: i64, seconds: f64) -> BestRun {
        BestRun { attempt, seconds }
    }

    #[test]
    fn test_any_run_beats_no_record() {
        assert!(run(1, 0.5).improves_attempt(None));
        assert!(run(1, 9999.0).improves_completion(None));
    }

    #[test]
    fn test_attempt_prefers_longer() {
        let best = run(3, 45.2);
        assert!(run(7, 45.3).improves_attempt(Some(&best)));
        assert!(!run(7, 45.2).improves_attempt(Some(&best)));
        assert!(!run(7, 10.0).improves_attempt(Some(&best)));
    }

    #[test]
    fn test_completion_prefers_faster() {
        let best = run(12, 88.1);
        assert!(run(20, 87.9).improves_completion(Some(&best)));
        assert!(!run(20, 88.1).improves_completion(Some(&best)));
        assert!(!run(20, 120.0).improves_completion(Some(&best)));
    }
}
