//! The watch loop.
//!
//! One tick: grab a frame, stitch the configured regions, OCR the result,
//! classify the text, and advance the run state machine. Transitions drive
//! music playback and record updates. Capture or OCR failures skip the tick
//! rather than aborting the watch.
//!
//! While the loop runs the terminal is in raw mode so single keys work as
//! overrides for OCR misses: `g` force-stops the run, `c` force-completes
//! it, `m` switches maps, `k` quits.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal;
use image::RgbaImage;

use crate::config::{CaptureRegion, Config};
use crate::core::{matching, slug};
use crate::error::FloodwatchError;
use crate::features::music::MusicPlayer;
use crate::features::records::{BestRun, MapRecord, RecordStore, SessionRecord};
use crate::output::log;
use crate::screen::{composite, ScreenSource, TextRecognizer};

use super::phrases::PhraseClassifier;
use super::state::{RunDetector, RunEvent};

/// Why the watch loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchOutcome {
    /// The player escaped the map.
    Escaped,
    /// The user asked to quit.
    Quit,
    /// The user asked to watch a different map.
    SwitchMap,
}

/// Watches one map until an escape or a user command.
pub struct Watcher<'a, S: ScreenSource, R: TextRecognizer> {
    screen: S,
    ocr: R,
    classifier: PhraseClassifier,
    detector: RunDetector,
    regions: Vec<CaptureRegion>,
    poll_interval: Duration,
    countdown_pause: Duration,
    store: &'a RecordStore,
    player: MusicPlayer,
    map: MapRecord,
    session: SessionRecord,
    session_id: i64,
    completions_dir: PathBuf,
    interactive: bool,
}

impl<'a, S: ScreenSource, R: TextRecognizer> Watcher<'a, S, R> {
    /// Create a watcher over an already-opened session.
    ///
    /// # Errors
    ///
    /// Returns an error if `session` has not been persisted yet.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        screen: S,
        ocr: R,
        config: &Config,
        store: &'a RecordStore,
        player: MusicPlayer,
        map: MapRecord,
        session: SessionRecord,
        completions_dir: PathBuf,
        interactive: bool,
    ) -> Result<Self, FloodwatchError> {
        let session_id = session.id.ok_or_else(|| {
            FloodwatchError::Database("Session has no ID; open it before watching".to_string())
        })?;

        Ok(Self {
            screen,
            ocr,
            classifier: PhraseClassifier::from_config(&config.detector),
            detector: RunDetector::new(),
            regions: config.screen.regions.clone(),
            poll_interval: Duration::from_millis(config.detector.poll_interval_ms),
            countdown_pause: Duration::from_millis(config.detector.countdown_pause_ms),
            store,
            player,
            map,
            session,
            session_id,
            completions_dir,
            interactive,
        })
    }

    /// The session as updated by the watch so far.
    #[must_use]
    pub const fn session(&self) -> &SessionRecord {
        &self.session
    }

    /// The map as updated by the watch so far.
    #[must_use]
    pub const fn map(&self) -> &MapRecord {
        &self.map
    }

    /// Run the watch loop until an escape or a user command.
    ///
    /// # Errors
    ///
    /// Returns an error if a record update fails. Capture and OCR errors
    /// are logged and skipped instead.
    pub fn run(&mut self) -> Result<WatchOutcome, FloodwatchError> {
        let _raw = self.interactive.then(RawModeGuard::enable);

        log::info(&format!(
            "Watching '{}'. Keys: [g] force stop, [c] force complete, [m] switch map, [k] quit",
            self.map.name
        ));

        loop {
            if self.interactive {
                if let Some(outcome) = self.handle_key()? {
                    return Ok(outcome);
                }
            }
            if let Some(outcome) = self.tick()? {
                return Ok(outcome);
            }
            std::thread::sleep(self.poll_interval);
        }
    }

    /// Process one pending key press, if any.
    fn handle_key(&mut self) -> Result<Option<WatchOutcome>, FloodwatchError> {
        let Some(key) = poll_key() else {
            return Ok(None);
        };

        match key {
            'g' => {
                if let Some(RunEvent::Stopped { attempt, seconds }) = self.detector.stop() {
                    log::warn(&format!("Run force-stopped (attempt {attempt}, {seconds}s)"));
                    self.finish_stop(attempt, seconds)?;
                }
                Ok(None)
            }
            'c' => self.force_complete(),
            'm' => {
                if let Some(RunEvent::Stopped { attempt, seconds }) = self.detector.stop() {
                    self.finish_stop(attempt, seconds)?;
                }
                Ok(Some(WatchOutcome::SwitchMap))
            }
            'k' => {
                if let Some(RunEvent::Stopped { attempt, seconds }) = self.detector.stop() {
                    self.finish_stop(attempt, seconds)?;
                }
                Ok(Some(WatchOutcome::Quit))
            }
            _ => Ok(None),
        }
    }

    /// Complete the current run by hand, for when OCR misses the escape
    /// screen. Grabs a fresh frame so the completion screenshot is still
    /// saved; a failed grab is logged like any other capture failure.
    fn force_complete(&mut self) -> Result<Option<WatchOutcome>, FloodwatchError> {
        let Some(RunEvent::Escaped { attempt, seconds }) = self.detector.escape() else {
            return Ok(None);
        };
        log::warn(&format!("Run force-completed (attempt {attempt}, {seconds}s)"));

        let frame = match self.screen.frame() {
            Ok(frame) => Some(frame),
            Err(e) => {
                log::warn(&format!("Capture failed: {e}"));
                None
            }
        };

        self.finish_escape(attempt, seconds, frame.as_ref())?;
        Ok(Some(WatchOutcome::Escaped))
    }

    /// One sampling tick.
    fn tick(&mut self) -> Result<Option<WatchOutcome>, FloodwatchError> {
        let frame = match self.screen.frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::warn(&format!("Capture failed: {e}"));
                return Ok(None);
            }
        };

        let stitched = composite(&frame, &self.regions);
        let raw = match self.ocr.recognize(&stitched) {
            Ok(text) => text,
            Err(e) => {
                log::warn(&format!("OCR failed: {e}"));
                return Ok(None);
            }
        };

        let text = matching::normalize(&raw);
        log::debug(&text);

        if !self.detector.is_running() {
            if let Some(start) = self.classifier.match_start(&text) {
                // The countdown overlay precedes the actual start; hold the
                // music so it lands on the run, not the countdown.
                if start.countdown && !self.countdown_pause.is_zero() {
                    std::thread::sleep(self.countdown_pause);
                }
                if let Err(e) = self.player.play_from_start() {
                    log::warn(&format!("Music playback failed: {e}"));
                }
                if let Some(RunEvent::Started { attempt }) = self.detector.start() {
                    self.store.add_map_attempt(&self.map.name)?;
                    self.map.total_attempts += 1;
                    log::matched(&format!(
                        "Attempt {attempt} started on '{}' (matched \"{}\")",
                        self.map.name, start.matched
                    ));
                }
            }
            return Ok(None);
        }

        // Escape first: the escape screen can also carry stop words
        if let Some(escaped) = self.classifier.match_escape(&text) {
            if let Some(RunEvent::Escaped { attempt, seconds }) = self.detector.escape() {
                log::matched(&format!("Escape detected: \"{escaped}\""));
                self.finish_escape(attempt, seconds, Some(&frame))?;
                return Ok(Some(WatchOutcome::Escaped));
            }
        } else if let Some(stopped) = self.classifier.match_stop(&text) {
            let matched = stopped.to_string();
            if let Some(RunEvent::Stopped { attempt, seconds }) = self.detector.stop() {
                log::matched(&format!("Run over after {seconds}s (matched \"{matched}\")"));
                self.finish_stop(attempt, seconds)?;
            }
        }

        Ok(None)
    }

    /// Persist the end of a run that did not escape.
    fn finish_stop(&mut self, attempt: i64, seconds: f64) -> Result<(), FloodwatchError> {
        self.player.stop();
        self.sync_session_totals()?;

        let candidate = BestRun { attempt, seconds };
        if candidate.improves_attempt(self.session.best_attempt.as_ref()) {
            self.session.best_attempt = Some(candidate);
            self.store
                .set_session_best_attempt(self.session_id, &candidate)?;

            // Map bests only move when the session best did; attempt numbers
            // on the map record are map-cumulative.
            let map_candidate = BestRun {
                attempt: self.map.total_attempts,
                seconds,
            };
            if map_candidate.improves_attempt(self.map.best_attempt.as_ref()) {
                self.map.best_attempt = Some(map_candidate);
                self.store
                    .set_map_best_attempt(&self.map.name, &map_candidate)?;
                log::success(&format!("New map best attempt: {seconds}s"));
            } else {
                log::success(&format!("New session best attempt: {seconds}s"));
            }
        }

        Ok(())
    }

    /// Persist an escape, saving a completion screenshot when a frame is
    /// available.
    fn finish_escape(
        &mut self,
        attempt: i64,
        seconds: f64,
        frame: Option<&RgbaImage>,
    ) -> Result<(), FloodwatchError> {
        // The song plays out after an escape; only deaths and quits cut it.
        self.store.add_map_completion(&self.map.name)?;
        self.map.total_completions += 1;
        self.sync_session_totals()?;

        log::success(&format!(
            "Escaped '{}' after {seconds}s ({}/{} completions)",
            self.map.name, self.map.total_completions, self.map.total_attempts
        ));

        let candidate = BestRun { attempt, seconds };
        if candidate.improves_completion(self.session.best_completion.as_ref()) {
            self.session.best_completion = Some(candidate);
            self.store
                .set_session_best_completion(self.session_id, &candidate)?;

            let map_candidate = BestRun {
                attempt: self.map.total_attempts,
                seconds,
            };
            if map_candidate.improves_completion(self.map.best_completion.as_ref()) {
                self.map.best_completion = Some(map_candidate);
                self.store
                    .set_map_best_completion(&self.map.name, &map_candidate)?;
                log::success(&format!("New map best completion: {seconds}s"));
            } else {
                log::success(&format!("New session best completion: {seconds}s"));
            }
        }

        if let Some(frame) = frame {
            self.save_completion_shot(frame);
        }

        Ok(())
    }

    fn sync_session_totals(&mut self) -> Result<(), FloodwatchError> {
        self.session.attempts = self.detector.attempts();
        self.session.completions = self.detector.completions();
        self.store.update_session_totals(
            self.session_id,
            self.session.attempts,
            self.session.completions,
        )
    }

    /// Save the full escape-screen frame for posterity. Failures are logged,
    /// not fatal.
    fn save_completion_shot(&self, frame: &RgbaImage) {
        let unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        let file = format!(
            "{}_{unix}_completion_{}.png",
            slug::slugify(&self.map.name),
            self.map.total_completions
        );
        let path = self.completions_dir.join(file);

        match frame.save(&path) {
            Ok(()) => log::info(&format!("Saved completion screenshot: {}", path.display())),
            Err(e) => log::warn(&format!("Failed to save completion screenshot: {e}")),
        }
    }
}

/// Read one pending key press without blocking.
fn poll_key() -> Option<char> {
    if !event::poll(Duration::ZERO).unwrap_or(false) {
        return None;
    }
    match event::read() {
        Ok(Event::Key(KeyEvent {
            code: KeyCode::Char(c),
            kind: KeyEventKind::Press,
            ..
        })) => Some(c.to_ascii_lowercase()),
        _ => None,
    }
}

/// Puts the terminal in raw mode for the watch, restoring it on drop.
struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    fn enable() -> Self {
        Self {
            active: terminal::enable_raw_mode().is_ok(),
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.active {
            let _ = terminal::disable_raw_mode();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{MockScreenSource, MockTextRecognizer};
    use crate::storage::Database;
    use mockall::Sequence;
    use tempfile::TempDir;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.detector.poll_interval_ms = 0;
        config.detector.countdown_pause_ms = 0;
        config
    }

    fn test_store() -> RecordStore {
        RecordStore::with_database(Database::open_in_memory().unwrap())
    }

    fn frame_source() -> MockScreenSource {
        let mut screen = MockScreenSource::new();
        screen
            .expect_frame()
            .returning(|| Ok(RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]))));
        screen
    }

    fn scripted_ocr(texts: &[Result<&str, ()>]) -> MockTextRecognizer {
        let mut ocr = MockTextRecognizer::new();
        let mut seq = Sequence::new();
        for text in texts {
            let text: Result<String, ()> = (*text).map(String::from);
            ocr.expect_recognize()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_| {
                    text.clone()
                        .map_err(|()| FloodwatchError::Ocr("scripted failure".to_string()))
                });
        }
        ocr
    }

    fn watcher_for<'a>(
        store: &'a RecordStore,
        screen: MockScreenSource,
        ocr: MockTextRecognizer,
        completions_dir: &TempDir,
    ) -> Watcher<'a, MockScreenSource, MockTextRecognizer> {
        let map = store.ensure_map("Lost Woods", None).unwrap();
        let mut session = SessionRecord::open("Lost Woods");
        store.open_session(&mut session).unwrap();

        Watcher::new(
            screen,
            ocr,
            &test_config(),
            store,
            MusicPlayer::silent(),
            map,
            session,
            completions_dir.path().to_path_buf(),
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_run_until_escape() {
        let store = test_store();
        let dir = TempDir::new().unwrap();
        let ocr = scripted_ocr(&[
            Ok("lobby chatter"),
            Ok("Get Ready: 3"),
            Ok("still swimming"),
            Ok("3/5 escaped"),
        ]);
        let mut watcher = watcher_for(&store, frame_source(), ocr, &dir);

        let outcome = watcher.run().unwrap();
        assert_eq!(outcome, WatchOutcome::Escaped);

        let map = store.get_map("Lost Woods").unwrap().unwrap();
        assert_eq!(map.total_attempts, 1);
        assert_eq!(map.total_completions, 1);
        assert!(map.best_completion.is_some());

        let session = watcher.session();
        assert_eq!(session.attempts, 1);
        assert_eq!(session.completions, 1);
        assert_eq!(session.best_completion.unwrap().attempt, 1);
        // Attempt bests only move on non-escape stops
        assert!(session.best_attempt.is_none());

        // Escape frame saved to the completions directory
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_stopped_run_then_escape() {
        let store = test_store();
        let dir = TempDir::new().unwrap();
        let ocr = scripted_ocr(&[
            Ok("get ready: 3"),
            Ok("you drowned"),
            Ok("rescue the others"),
            Ok("1/4 escaped"),
        ]);
        let mut watcher = watcher_for(&store, frame_source(), ocr, &dir);

        let outcome = watcher.run().unwrap();
        assert_eq!(outcome, WatchOutcome::Escaped);

        let session = watcher.session();
        assert_eq!(session.attempts, 2);
        assert_eq!(session.completions, 1);
        assert_eq!(session.best_attempt.unwrap().attempt, 1);
        assert_eq!(session.best_completion.unwrap().attempt, 2);

        let map = store.get_map("Lost Woods").unwrap().unwrap();
        assert_eq!(map.total_attempts, 2);
        assert_eq!(map.total_completions, 1);
        // Map best numbers are map-cumulative
        assert_eq!(map.best_attempt.unwrap().attempt, 1);
        assert_eq!(map.best_completion.unwrap().attempt, 2);
    }

    #[test]
    fn test_ocr_failure_skips_tick() {
        let store = test_store();
        let dir = TempDir::new().unwrap();
        let ocr = scripted_ocr(&[Err(()), Ok("get ready: 3"), Ok("2/2 escaped")]);
        let mut watcher = watcher_for(&store, frame_source(), ocr, &dir);

        let outcome = watcher.run().unwrap();
        assert_eq!(outcome, WatchOutcome::Escaped);
        assert_eq!(watcher.session().attempts, 1);
    }

    #[test]
    fn test_capture_failure_skips_tick() {
        let store = test_store();
        let dir = TempDir::new().unwrap();

        let mut screen = MockScreenSource::new();
        let mut seq = Sequence::new();
        screen
            .expect_frame()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(FloodwatchError::Capture("scripted failure".to_string())));
        screen
            .expect_frame()
            .times(2)
            .in_sequence(&mut seq)
            .returning(|| Ok(RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]))));

        // OCR never runs on the failed tick
        let ocr = scripted_ocr(&[Ok("get ready: 3"), Ok("1/1 escaped")]);
        let mut watcher = watcher_for(&store, screen, ocr, &dir);

        let outcome = watcher.run().unwrap();
        assert_eq!(outcome, WatchOutcome::Escaped);
        assert_eq!(watcher.session().attempts, 1);
        assert_eq!(watcher.session().completions, 1);
    }

    #[test]
    fn test_force_complete_saves_screenshot() {
        let store = test_store();
        let dir = TempDir::new().unwrap();
        let ocr = scripted_ocr(&[Ok("get ready: 3")]);
        let mut watcher = watcher_for(&store, frame_source(), ocr, &dir);

        // Ignored while idle
        assert!(watcher.force_complete().unwrap().is_none());

        watcher.tick().unwrap();
        let outcome = watcher.force_complete().unwrap();
        assert_eq!(outcome, Some(WatchOutcome::Escaped));

        let map = store.get_map("Lost Woods").unwrap().unwrap();
        assert_eq!(map.total_completions, 1);
        assert_eq!(watcher.session().completions, 1);
        // Manual completions grab a fresh frame for the screenshot
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_escape_outranks_stop_words() {
        let store = test_store();
        let dir = TempDir::new().unwrap();
        // The escape screen can carry stop words ("round", "next") too
        let ocr = scripted_ocr(&[Ok("get ready: 3"), Ok("next round soon: 3/5 escaped")]);
        let mut watcher = watcher_for(&store, frame_source(), ocr, &dir);

        let outcome = watcher.run().unwrap();
        assert_eq!(outcome, WatchOutcome::Escaped);
        assert_eq!(watcher.session().completions, 1);
        assert!(watcher.session().best_completion.is_some());
        assert!(watcher.session().best_attempt.is_none());
    }

    #[test]
    fn test_unpersisted_session_rejected() {
        let store = test_store();
        store.ensure_map("Lost Woods", None).unwrap();

        let result = Watcher::new(
            MockScreenSource::new(),
            MockTextRecognizer::new(),
            &test_config(),
            &store,
            MusicPlayer::silent(),
            MapRecord::new("Lost Woods", None),
            SessionRecord::open("Lost Woods"),
            std::env::temp_dir(),
            false,
        );

        assert!(result.is_err());
    }
}
