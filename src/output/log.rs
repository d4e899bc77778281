//! Watch-loop logging.
//!
//! Every line goes to the console with a timestamp and colored level tag;
//! a plain copy is appended to `logs/latest.log`, which is truncated at
//! startup so it only ever holds the most recent watch. `debug` lines go
//! to the file only.
//!
//! Console lines end with `\r\n` because the watch loop runs the terminal
//! in raw mode for single-key commands.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;
use once_cell::sync::OnceCell;

use crate::config::Paths;
use crate::error::FloodwatchError;

static LOG_FILE: OnceCell<PathBuf> = OnceCell::new();

const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S%.3f";

/// Point the file log at `logs/latest.log` under `paths`, truncating any
/// previous contents. Safe to call more than once; later calls are no-ops.
///
/// # Errors
///
/// Returns `FloodwatchError::Io` if the log file cannot be created.
pub fn init(paths: &Paths) -> Result<(), FloodwatchError> {
    let file = paths.logs.join("latest.log");
    std::fs::write(&file, "")?;
    let _ = LOG_FILE.set(file);
    Ok(())
}

fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

fn write_file(level: &str, message: &str) {
    let Some(path) = LOG_FILE.get() else {
        return;
    };
    if let Ok(mut file) = OpenOptions::new().append(true).open(path) {
        let _ = writeln!(file, "[{}] [{level}] {message}", timestamp());
    }
}

fn emit(level: &str, colored_level: &str, message: &str) {
    print!(
        "[{}] [{colored_level}] {message}\r\n",
        timestamp().dimmed()
    );
    write_file(level, message);
}

pub fn info(message: &str) {
    emit("INFO", &"INFO".blue().to_string(), message);
}

/// A phrase or pattern match worth calling out.
pub fn matched(message: &str) {
    emit("MATCH", &"MATCH".magenta().bold().to_string(), message);
}

pub fn success(message: &str) {
    emit("SUCCESS", &"SUCCESS".green().bold().to_string(), message);
}

pub fn warn(message: &str) {
    emit("WARN", &"WARN".yellow().to_string(), message);
}

pub fn error(message: &str) {
    emit("ERROR", &"ERROR".red().bold().to_string(), message);
}

/// File-only detail, mostly raw OCR text per tick.
pub fn debug(message: &str) {
    write_file("DEBUG", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_and_append() {
        let dir = TempDir::new().unwrap();
        let paths = Paths::with_root(dir.path().to_path_buf());
        paths.ensure_dirs().unwrap();

        init(&paths).unwrap();
        info("hello from the test");
        debug("debug only line");

        let contents = std::fs::read_to_string(paths.logs.join("latest.log")).unwrap();
        assert!(contents.contains("[INFO] hello from the test"));
        assert!(contents.contains("[DEBUG] debug only line"));
    }
}
