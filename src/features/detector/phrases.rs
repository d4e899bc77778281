//! Phrase classification of OCR text.
//!
//! Three phrase families, all configurable:
//! - start phrases mark a run beginning ("get ready: ", "rescue")
//! - stop phrases mark a death or return to lobby ("round", "join", ...)
//! - countdown phrases ("get ready: 3" ...) are matched fuzzily, since the
//!   countdown overlay is the hardest text on screen for Tesseract
//!
//! Escapes are a separate pattern: the game shows "N/M escaped" when the
//! player reaches the exit.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::DetectorConfig;
use crate::core::matching;

static ESCAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)/(\d+) escaped").unwrap_or_else(|e| panic!("Invalid escape regex: {e}"))
});

/// Number of characters of OCR text compared against countdown phrases.
///
/// The countdown overlay renders first on screen, so only the text prefix
/// is relevant; matching the whole line would dilute the edit distance.
const COUNTDOWN_PREFIX_CHARS: usize = 12;

/// A matched run start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartMatch {
    /// What triggered the match, for logging.
    pub matched: String,
    /// Whether this was the countdown overlay, which precedes the actual
    /// run start by roughly a second.
    pub countdown: bool,
}

/// Classifies normalized OCR text against the configured phrase sets.
pub struct PhraseClassifier {
    start_phrases: Vec<String>,
    stop_phrases: Vec<String>,
    countdown_phrases: Vec<String>,
    max_distance: usize,
}

impl PhraseClassifier {
    /// Build a classifier from detector settings.
    #[must_use]
    pub fn from_config(config: &DetectorConfig) -> Self {
        Self {
            start_phrases: config.start_phrases.clone(),
            stop_phrases: config.stop_phrases.clone(),
            countdown_phrases: config.countdown_phrases.clone(),
            max_distance: config.max_distance,
        }
    }

    /// Check text for a run start.
    ///
    /// Exact substring matches are tried first; the text prefix is then
    /// compared fuzzily against the countdown phrases.
    #[must_use]
    pub fn match_start(&self, text: &str) -> Option<StartMatch> {
        if let Some(matched) = matching::find_substring(text, &self.start_phrases) {
            return Some(StartMatch {
                matched: matched.to_string(),
                countdown: text.contains("get ready:"),
            });
        }

        let prefix: String = text.chars().take(COUNTDOWN_PREFIX_CHARS).collect();
        if matching::within_distance(&prefix, &self.countdown_phrases, self.max_distance) {
            return Some(StartMatch {
                matched: "[fuzzy countdown]".to_string(),
                countdown: true,
            });
        }

        None
    }

    /// Check text for a run stop, returning the phrase that matched.
    #[must_use]
    pub fn match_stop(&self, text: &str) -> Option<&str> {
        matching::find_substring(text, &self.stop_phrases)
    }

    /// Check text for an escape, returning the matched "N/M escaped" text.
    #[must_use]
    pub fn match_escape(&self, text: &str) -> Option<String> {
        ESCAPE.find(text).map(|m| m.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> PhraseClassifier {
        PhraseClassifier::from_config(&DetectorConfig::default())
    }

    #[test]
    fn test_start_substring() {
        let c = classifier();

        let m = c.match_start("get ready: 3").unwrap();
        assert_eq!(m.matched, "get ready: ");
        assert!(m.countdown);

        let m = c.match_start("rescue the others").unwrap();
        assert_eq!(m.matched, "rescue");
        assert!(!m.countdown);

        assert!(c.match_start("nothing relevant").is_none());
    }

    #[test]
    fn test_start_fuzzy_countdown() {
        let c = classifier();

        // Misread countdown, within distance 3 of "get ready: 3"
        let m = c.match_start("qet ready 3 something trailing").unwrap();
        assert_eq!(m.matched, "[fuzzy countdown]");
        assert!(m.countdown);
    }

    #[test]
    fn test_start_fuzzy_rejects_ellipsis() {
        let c = classifier();
        // Loading screen artifact; must not start a run
        assert!(c.match_start("get ready..").is_none());
    }

    #[test]
    fn test_stop_phrases() {
        let c = classifier();

        assert_eq!(c.match_stop("you drowned"), Some("drowned"));
        assert_eq!(c.match_stop("round over, join the next"), Some("round"));
        assert_eq!(c.match_stop("still swimming"), None);
    }

    #[test]
    fn test_escape_pattern() {
        let c = classifier();

        assert_eq!(
            c.match_escape("3/5 escaped the facility"),
            Some("3/5 escaped".to_string())
        );
        assert_eq!(c.match_escape("12/12 escaped"), Some("12/12 escaped".to_string()));
        assert!(c.match_escape("escaped").is_none());
        assert!(c.match_escape("3 of 5 escaped").is_none());
    }
}
