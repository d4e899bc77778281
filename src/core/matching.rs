//! Text matching primitives for OCR output.
//!
//! OCR text is noisy: casing varies, line breaks land mid-phrase, and
//! characters get misread. These helpers normalize recognized text and
//! match it against phrase lists, exactly or with fuzzy tolerance.

use strsim::damerau_levenshtein;

/// Normalize raw OCR output for matching: trim, join lines with spaces,
/// and lowercase.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.trim().replace('\n', " ").to_lowercase()
}

/// Find the first phrase that occurs as a substring of `text`.
///
/// Returns the matched phrase so callers can report what triggered.
#[must_use]
pub fn find_substring<'a>(text: &str, phrases: &'a [String]) -> Option<&'a str> {
    phrases
        .iter()
        .find(|phrase| text.contains(phrase.as_str()))
        .map(String::as_str)
}

/// Check whether `target` is within `max_distance` edits of any phrase.
///
/// Uses Damerau-Levenshtein distance, which tolerates the transpositions
/// and single-character misreads Tesseract produces on stylized game text.
///
/// Targets containing `".."` are rejected outright: the game renders a
/// trailing ellipsis while loading, and OCR turns it into text that sits
/// within edit distance of the countdown phrases.
#[must_use]
pub fn within_distance(target: &str, phrases: &[String], max_distance: usize) -> bool {
    if target.contains("..") {
        return false;
    }

    phrases
        .iter()
        .any(|phrase| damerau_levenshtein(target, phrase) <= max_distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phrases(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Get Ready: 3\nRescue  "), "get ready: 3 rescue");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_find_substring() {
        let list = phrases(&["round", "join", "next", "drowned"]);

        assert_eq!(find_substring("you drowned", &list), Some("drowned"));
        assert_eq!(find_substring("next round starting", &list), Some("round"));
        assert_eq!(find_substring("swimming along", &list), None);
    }

    #[test]
    fn test_find_substring_reports_first_match() {
        let list = phrases(&["round", "next"]);
        // Both occur; list order decides
        assert_eq!(find_substring("next round", &list), Some("round"));
    }

    #[test]
    fn test_within_distance_exact() {
        let list = phrases(&["get ready: 3"]);
        assert!(within_distance("get ready: 3", &list, 0));
    }

    #[test]
    fn test_within_distance_tolerates_misreads() {
        let list = phrases(&["get ready: 3", "get ready: 2", "get ready: 1"]);

        // 'g' misread as 'q', colon dropped
        assert!(within_distance("qet ready 3", &list, 3));
        // transposed characters
        assert!(within_distance("get raedy: 2", &list, 3));
        // too far off
        assert!(!within_distance("completely else", &list, 3));
    }

    #[test]
    fn test_within_distance_rejects_ellipsis_artifacts() {
        let list = phrases(&["get ready: 3"]);
        // Loading ellipsis would otherwise sit within tolerance
        assert!(!within_distance("get ready..", &list, 3));
    }
}
