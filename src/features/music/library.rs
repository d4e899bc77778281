//! Music library scanning.

use std::path::{Path, PathBuf};

use crate::error::FloodwatchError;

/// File extensions treated as playable music.
const MUSIC_EXTENSIONS: [&str; 4] = ["mp3", "ogg", "wav", "flac"];

/// Recursively collect music files under `dir`, sorted by path.
///
/// A missing directory yields an empty library rather than an error.
pub fn scan_library(dir: &Path) -> Result<Vec<PathBuf>, FloodwatchError> {
    let mut files = Vec::new();
    if dir.exists() {
        walk(dir, &mut files)?;
    }
    files.sort();
    Ok(files)
}

fn walk(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), FloodwatchError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, files)?;
        } else if is_music(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_music(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MUSIC_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Display a library file relative to its root, with forward slashes.
#[must_use]
pub fn relative_display(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let files = scan_library(Path::new("/nonexistent/music")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_scan_filters_and_recurses() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir(root.join("ost")).unwrap();
        std::fs::write(root.join("a.mp3"), b"").unwrap();
        std::fs::write(root.join("notes.txt"), b"").unwrap();
        std::fs::write(root.join("ost").join("b.OGG"), b"").unwrap();

        let files = scan_library(root).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.mp3"));
        assert!(files[1].ends_with("b.OGG"));
    }

    #[test]
    fn test_relative_display() {
        let root = Path::new("/home/user/.floodwatch/music");
        let path = root.join("ost").join("flood.mp3");
        assert_eq!(relative_display(&path, root), "ost/flood.mp3");
    }
}
