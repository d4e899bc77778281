//! JSON output.

use serde::Serialize;

use crate::error::FloodwatchError;

/// Serialize any value as pretty-printed JSON.
///
/// # Errors
///
/// Returns `FloodwatchError::Parse` if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, FloodwatchError> {
    serde_json::to_string_pretty(value).map_err(FloodwatchError::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::records::MapRecord;

    #[test]
    fn test_map_to_json() {
        let map = MapRecord::new("Lost Woods", None);
        let json = to_json(&map).unwrap();

        assert!(json.contains("\"name\": \"Lost Woods\""));
        assert!(json.contains("\"total_attempts\": 0"));
    }
}
