//! The watch command: wires prompts, music, the screen pipeline, and record
//! keeping around the monitor loop.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::cli::args::WatchArgs;
use crate::config::{Config, Paths};
use crate::error::FloodwatchError;
use crate::features::detector::{WatchOutcome, Watcher};
use crate::features::interactive::{confirm, pick_map, pick_song, prompt_volume, MapChoice};
use crate::features::music::{relative_display, scan_library, MusicPlayer};
use crate::features::records::{MapRecord, RecordStore, SessionRecord};
use crate::output::{self, log};
use crate::screen::{CommandScreenSource, TesseractOcr};
use crate::storage::Database;

/// Execute the watch command.
///
/// Loops over map selection so "switch map" re-enters the picker; each pass
/// opens a session, runs the monitor, and closes the session with a summary.
///
/// # Errors
///
/// Returns an error if setup (paths, config, database, capture command)
/// fails, a record update fails, or input ends mid-prompt.
pub fn watch(args: &WatchArgs) -> Result<(), FloodwatchError> {
    let paths = Paths::new()?;
    paths.ensure_dirs()?;
    let config = Config::load_from(&paths)?;
    log::init(&paths)?;

    let store = RecordStore::with_database(Database::open_at(&paths.database)?);

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut out = std::io::stdout();

    let mut preset = args.map.clone();
    loop {
        let map = select_map(&mut input, &mut out, &store, preset.take())?;
        let player = build_player(&mut input, &mut out, &store, &config, &paths, &map, args)?;

        let mut session = SessionRecord::open(&map.name);
        store.open_session(&mut session)?;
        writeln!(out, "{}", output::format_map_pretty(&map))?;

        let screen = CommandScreenSource::new(config.screen.capture_command.as_deref())?;
        let ocr = TesseractOcr::new(config.screen.tesseract_command.as_deref());
        let mut watcher = Watcher::new(
            screen,
            ocr,
            &config,
            &store,
            player,
            map,
            session,
            paths.completions.clone(),
            true,
        )?;
        let outcome = watcher.run()?;

        let mut session = watcher.session().clone();
        session.close();
        if let (Some(id), Some(ended_at)) = (session.id, session.ended_at) {
            store.close_session(id, ended_at)?;
        }
        writeln!(out, "{}", output::format_session_summary(&session))?;

        match outcome {
            WatchOutcome::Quit => break,
            WatchOutcome::SwitchMap => {}
            WatchOutcome::Escaped => {
                if !confirm(&mut input, &mut out, "Watch another map?", true)? {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Resolve the map to watch, creating it on first use.
fn select_map(
    input: &mut impl BufRead,
    out: &mut impl Write,
    store: &RecordStore,
    preset: Option<String>,
) -> Result<MapRecord, FloodwatchError> {
    if let Some(name) = preset {
        return store.ensure_map(&name, None);
    }

    let maps = store.list_maps()?;
    let (MapChoice::Existing(name) | MapChoice::New(name)) = pick_map(input, out, &maps)?;
    store.ensure_map(&name, None)
}

/// Build the music player for a map, prompting as needed.
///
/// A missing audio device or an undecodable song degrades to a silent
/// player rather than aborting the watch.
fn build_player(
    input: &mut impl BufRead,
    out: &mut impl Write,
    store: &RecordStore,
    config: &Config,
    paths: &Paths,
    map: &MapRecord,
    args: &WatchArgs,
) -> Result<MusicPlayer, FloodwatchError> {
    if args.no_music {
        return Ok(MusicPlayer::silent());
    }

    let song = match &map.song {
        Some(saved) => {
            let path = paths.music.join(saved);
            if path.exists() {
                Some(path)
            } else {
                writeln!(out, "Saved song '{saved}' is missing; pick another.")?;
                choose_song(input, out, store, paths, &map.name)?
            }
        }
        None => {
            if confirm(input, out, &format!("Play music on '{}'?", map.name), true)? {
                choose_song(input, out, store, paths, &map.name)?
            } else {
                None
            }
        }
    };

    let Some(song) = song else {
        return Ok(MusicPlayer::silent());
    };

    let volume = match args.volume {
        Some(volume) => volume,
        None => prompt_volume(input, out, config.music.default_volume)?,
    };

    match MusicPlayer::with_song(&song, volume) {
        Ok(player) => Ok(player),
        Err(e) => {
            log::warn(&format!("Music disabled: {e}"));
            Ok(MusicPlayer::silent())
        }
    }
}

/// Pick a song from the library and remember it on the map record.
fn choose_song(
    input: &mut impl BufRead,
    out: &mut impl Write,
    store: &RecordStore,
    paths: &Paths,
    map_name: &str,
) -> Result<Option<PathBuf>, FloodwatchError> {
    let library = scan_library(&paths.music)?;
    let Some(song) = pick_song(input, out, &library, &paths.music)? else {
        return Ok(None);
    };

    store.set_song(map_name, Some(&relative_display(&song, &paths.music)))?;
    Ok(Some(song))
}
