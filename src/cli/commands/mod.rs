//! Command implementations for floodwatch.

mod watch;

pub use watch::watch;

use crate::cli::args::OutputFormat;
use crate::error::FloodwatchError;
use crate::features::records::RecordStore;
use crate::output::{format_map, format_maps, format_sessions};

/// Execute `maps list`.
///
/// # Errors
///
/// Returns an error if the database query or output formatting fails.
pub fn maps_list(store: &RecordStore, format: OutputFormat) -> Result<String, FloodwatchError> {
    let maps = store.list_maps()?;
    format_maps(&maps, format)
}

/// Execute `maps show`.
///
/// # Errors
///
/// Returns an error if the map does not exist or output formatting fails.
pub fn maps_show(
    store: &RecordStore,
    name: &str,
    format: OutputFormat,
) -> Result<String, FloodwatchError> {
    let map = store
        .get_map(name)?
        .ok_or_else(|| FloodwatchError::NotFound(format!("map '{name}'")))?;
    format_map(&map, format)
}

/// Execute `maps add`.
///
/// # Errors
///
/// Returns an error if the map already exists or the insert fails.
pub fn maps_add(
    store: &RecordStore,
    name: &str,
    song: Option<&str>,
) -> Result<String, FloodwatchError> {
    if store.get_map(name)?.is_some() {
        return Err(FloodwatchError::Input(format!("Map '{name}' already exists")));
    }

    let map = store.ensure_map(name, song)?;
    Ok(format!("Added map '{}'", map.name))
}

/// Execute `sessions`.
///
/// # Errors
///
/// Returns an error if the database query or output formatting fails.
pub fn sessions_list(
    store: &RecordStore,
    map: Option<&str>,
    limit: usize,
    format: OutputFormat,
) -> Result<String, FloodwatchError> {
    let sessions = store.list_sessions(map, limit)?;
    format_sessions(&sessions, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    fn test_store() -> RecordStore {
        RecordStore::with_database(Database::open_in_memory().unwrap())
    }

    #[test]
    fn test_maps_add_and_list() {
        let store = test_store();

        let message = maps_add(&store, "Lost Woods", Some("ost/forest.ogg")).unwrap();
        assert!(message.contains("Lost Woods"));

        let listing = maps_list(&store, OutputFormat::Pretty).unwrap();
        assert!(listing.contains("Lost Woods"));
        assert!(listing.contains("ost/forest.ogg"));
    }

    #[test]
    fn test_maps_add_duplicate_rejected() {
        let store = test_store();
        maps_add(&store, "Lost Woods", None).unwrap();

        let err = maps_add(&store, "Lost Woods", None).unwrap_err();
        assert!(matches!(err, FloodwatchError::Input(_)));
    }

    #[test]
    fn test_maps_show_missing() {
        let store = test_store();
        let err = maps_show(&store, "Nope", OutputFormat::Pretty).unwrap_err();
        assert!(matches!(err, FloodwatchError::NotFound(_)));
    }

    #[test]
    fn test_maps_show_json() {
        let store = test_store();
        maps_add(&store, "Lost Woods", None).unwrap();

        let json = maps_show(&store, "Lost Woods", OutputFormat::Json).unwrap();
        assert!(json.contains("\"name\": \"Lost Woods\""));
    }

    #[test]
    fn test_sessions_list_empty() {
        let store = test_store();
        let out = sessions_list(&store, None, 20, OutputFormat::Pretty).unwrap();
        assert!(out.contains("No sessions recorded"));
    }
}
