//! Filename-safe slugs for map names.
//!
//! Completion screenshots embed the map name in the filename; map names can
//! contain anything the game allows.

use once_cell::sync::Lazy;
use regex::Regex;

static STRIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap_or_else(|e| panic!("Invalid strip regex: {e}")));
static COLLAPSE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[-\s]+").unwrap_or_else(|e| panic!("Invalid collapse regex: {e}")));

/// Convert a map name into a lowercase, underscore-separated slug.
///
/// Non-alphanumeric characters (other than whitespace, `-` and `_`) are
/// stripped; runs of whitespace and dashes collapse to a single `_`;
/// leading and trailing separators are removed.
#[must_use]
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    let stripped = STRIP.replace_all(&lowered, "");
    let collapsed = COLLAPSE.replace_all(&stripped, "_");
    collapsed.trim_matches(|c| c == '-' || c == '_').to_string()
}
