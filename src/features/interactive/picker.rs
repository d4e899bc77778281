//! Numbered stdin prompts for map, song, and volume selection.
//!
//! All prompts take the input and output streams as arguments so tests can
//! drive them with in-memory buffers. Invalid entries re-prompt; end of
//! input is an error rather than an infinite loop.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::error::FloodwatchError;
use crate::features::music::relative_display;
use crate::features::records::MapRecord;

/// The user's map selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapChoice {
    /// An already-known map, by name.
    Existing(String),
    /// A map name not seen before.
    New(String),
}

/// Read one trimmed line, erroring on end of input.
fn read_line(
    input: &mut impl BufRead,
    output: &mut impl Write,
    prompt: &str,
) -> Result<String, FloodwatchError> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(FloodwatchError::Input("Unexpected end of input".to_string()));
    }
    Ok(line.trim().to_string())
}

/// Pick a map from the known list, or name a new one.
///
/// Known maps are shown numbered; entering a number selects one, entering
/// anything else names a map (existing names are recognized as such).
///
/// # Errors
///
/// Returns `FloodwatchError::Input` if input ends before a choice is made.
pub fn pick_map(
    input: &mut impl BufRead,
    output: &mut impl Write,
    maps: &[MapRecord],
) -> Result<MapChoice, FloodwatchError> {
    if maps.is_empty() {
        writeln!(output, "No maps yet.")?;
    } else {
        writeln!(output, "{}", "Maps:".bold())?;
        for (i, map) in maps.iter().enumerate() {
            writeln!(
                output,
                "  {}. {} ({}/{})",
                i + 1,
                map.name,
                map.total_completions,
                map.total_attempts
            )?;
        }
    }

    loop {
        let entry = read_line(input, output, "Map (number or name): ")?;
        if entry.is_empty() {
            continue;
        }

        if let Ok(number) = entry.parse::<usize>() {
            if number >= 1 && number <= maps.len() {
                return Ok(MapChoice::Existing(maps[number - 1].name.clone()));
            }
            writeln!(output, "No map numbered {number}.")?;
            continue;
        }

        // Known names are matched case-insensitively but returned in their
        // stored spelling, so lookups hit the existing row.
        if let Some(known) = maps.iter().find(|m| m.name.eq_ignore_ascii_case(&entry)) {
            return Ok(MapChoice::Existing(known.name.clone()));
        }
        return Ok(MapChoice::New(entry));
    }
}

/// Pick a song from the library, or none.
///
/// Songs are shown numbered relative to `music_root`; an empty entry means
/// no music.
///
/// # Errors
///
/// Returns `FloodwatchError::Input` if input ends before a choice is made.
pub fn pick_song(
    input: &mut impl BufRead,
    output: &mut impl Write,
    library: &[PathBuf],
    music_root: &Path,
) -> Result<Option<PathBuf>, FloodwatchError> {
    if library.is_empty() {
        writeln!(
            output,
            "No music found in {} (mp3/ogg/wav/flac).",
            music_root.display()
        )?;
        return Ok(None);
    }

    if let [only] = library {
        writeln!(
            output,
            "Playing the only song in the library: {}",
            relative_display(only, music_root)
        )?;
        return Ok(Some(only.clone()));
    }

    writeln!(output, "{}", "Songs:".bold())?;
    for (i, song) in library.iter().enumerate() {
        writeln!(output, "  {}. {}", i + 1, relative_display(song, music_root))?;
    }

    loop {
        let entry = read_line(input, output, "Song (number, empty for none): ")?;
        if entry.is_empty() {
            return Ok(None);
        }

        match entry.parse::<usize>() {
            Ok(number) if number >= 1 && number <= library.len() => {
                return Ok(Some(library[number - 1].clone()));
            }
            _ => writeln!(output, "Enter a number between 1 and {}.", library.len())?,
        }
    }
}

/// Prompt for a volume on the 0-100 scale, empty for `default`.
///
/// # Errors
///
/// Returns `FloodwatchError::Input` if input ends before a valid value.
pub fn prompt_volume(
    input: &mut impl BufRead,
    output: &mut impl Write,
    default: u8,
) -> Result<u8, FloodwatchError> {
    loop {
        let entry = read_line(input, output, &format!("Volume 0-100 [{default}]: "))?;
        if entry.is_empty() {
            return Ok(default);
        }

        match entry.parse::<u8>() {
            Ok(volume) if volume <= 100 => return Ok(volume),
            _ => writeln!(output, "Enter a number between 0 and 100.")?,
        }
    }
}

/// Yes/no prompt; empty means `default_yes`.
///
/// # Errors
///
/// Returns `FloodwatchError::Input` if input ends before an answer.
pub fn confirm(
    input: &mut impl BufRead,
    output: &mut impl Write,
    prompt: &str,
    default_yes: bool,
) -> Result<bool, FloodwatchError> {
    let hint = if default_yes { "[Y/n]" } else { "[y/N]" };
    loop {
        let entry = read_line(input, output, &format!("{prompt} {hint} "))?;
        match entry.to_ascii_lowercase().as_str() {
            "" => return Ok(default_yes),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => writeln!(output, "Please answer y or n.")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn maps(names: &[&str]) -> Vec<MapRecord> {
        names.iter().map(|n| MapRecord::new(n, None)).collect()
    }

    #[test]
    fn test_pick_map_by_number() {
        let mut input = Cursor::new(b"2\n");
        let mut output = Vec::new();

        let choice = pick_map(&mut input, &mut output, &maps(&["Alpha", "Beta"])).unwrap();
        assert_eq!(choice, MapChoice::Existing("Beta".to_string()));
    }

    #[test]
    fn test_pick_map_new_name() {
        let mut input = Cursor::new(b"Lost Woods\n");
        let mut output = Vec::new();

        let choice = pick_map(&mut input, &mut output, &maps(&["Alpha"])).unwrap();
        assert_eq!(choice, MapChoice::New("Lost Woods".to_string()));
    }

    #[test]
    fn test_pick_map_existing_name_recognized() {
        let mut input = Cursor::new(b"alpha\n");
        let mut output = Vec::new();

        let choice = pick_map(&mut input, &mut output, &maps(&["Alpha"])).unwrap();
        assert_eq!(choice, MapChoice::Existing("Alpha".to_string()));
    }

    #[test]
    fn test_pick_map_reprompts_on_bad_number() {
        let mut input = Cursor::new(b"9\n1\n");
        let mut output = Vec::new();

        let choice = pick_map(&mut input, &mut output, &maps(&["Alpha"])).unwrap();
        assert_eq!(choice, MapChoice::Existing("Alpha".to_string()));

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("No map numbered 9"));
    }

    #[test]
    fn test_pick_map_eof_is_error() {
        let mut input = Cursor::new(b"");
        let mut output = Vec::new();

        let err = pick_map(&mut input, &mut output, &[]).unwrap_err();
        assert!(matches!(err, FloodwatchError::Input(_)));
    }

    #[test]
    fn test_pick_song_empty_means_none() {
        let library = vec![PathBuf::from("/music/a.mp3"), PathBuf::from("/music/b.ogg")];
        let mut input = Cursor::new(b"\n");
        let mut output = Vec::new();

        let song = pick_song(&mut input, &mut output, &library, Path::new("/music")).unwrap();
        assert!(song.is_none());
    }

    #[test]
    fn test_pick_song_single_file_auto_selected() {
        let library = vec![PathBuf::from("/music/only.mp3")];
        let mut input = Cursor::new(b"");
        let mut output = Vec::new();

        let song = pick_song(&mut input, &mut output, &library, Path::new("/music")).unwrap();
        assert_eq!(song, Some(PathBuf::from("/music/only.mp3")));
    }

    #[test]
    fn test_pick_song_by_number() {
        let library = vec![PathBuf::from("/music/a.mp3"), PathBuf::from("/music/b.ogg")];
        let mut input = Cursor::new(b"bogus\n2\n");
        let mut output = Vec::new();

        let song = pick_song(&mut input, &mut output, &library, Path::new("/music")).unwrap();
        assert_eq!(song, Some(PathBuf::from("/music/b.ogg")));
    }

    #[test]
    fn test_pick_song_empty_library() {
        let mut input = Cursor::new(b"");
        let mut output = Vec::new();

        let song = pick_song(&mut input, &mut output, &[], Path::new("/music")).unwrap();
        assert!(song.is_none());
    }

    #[test]
    fn test_volume_default_and_bounds() {
        let mut output = Vec::new();

        let volume = prompt_volume(&mut Cursor::new(b"\n"), &mut output, 35).unwrap();
        assert_eq!(volume, 35);

        let volume = prompt_volume(&mut Cursor::new(b"150\n80\n"), &mut output, 35).unwrap();
        assert_eq!(volume, 80);
    }

    #[test]
    fn test_confirm_defaults() {
        let mut output = Vec::new();

        assert!(confirm(&mut Cursor::new(b"\n"), &mut output, "Music?", true).unwrap());
        assert!(!confirm(&mut Cursor::new(b"\n"), &mut output, "Music?", false).unwrap());
        assert!(!confirm(&mut Cursor::new(b"N\n"), &mut output, "Music?", true).unwrap());
    }
}
