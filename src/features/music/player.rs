//! Music playback over the default audio device.
//!
//! Each run restarts the song from the beginning, so playback uses a fresh
//! `Sink` per play rather than reusing one. A player without a song keeps
//! the same interface and does nothing, which also keeps the watch loop
//! testable on machines without an audio device.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::error::FloodwatchError;

/// Background music player.
pub struct MusicPlayer {
    backend: Option<Backend>,
}

impl std::fmt::Debug for MusicPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MusicPlayer")
            .field("has_song", &self.backend.is_some())
            .finish()
    }
}

struct Backend {
    // Dropping the stream kills playback; keep it alive with the handle.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    song: PathBuf,
    volume: f32,
    sink: Option<Sink>,
}

impl MusicPlayer {
    /// A player that plays nothing.
    #[must_use]
    pub const fn silent() -> Self {
        Self { backend: None }
    }

    /// A player for `song` at `volume` percent (0-100).
    ///
    /// # Errors
    ///
    /// Returns an error if no audio output device is available or the song
    /// file does not exist.
    pub fn with_song(song: &Path, volume: u8) -> Result<Self, FloodwatchError> {
        if !song.exists() {
            return Err(FloodwatchError::NotFound(format!(
                "song file {}",
                song.display()
            )));
        }

        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| FloodwatchError::Audio(format!("No audio output device: {e}")))?;

        Ok(Self {
            backend: Some(Backend {
                _stream: stream,
                handle,
                song: song.to_path_buf(),
                volume: f32::from(volume.min(100)) / 100.0,
                sink: None,
            }),
        })
    }

    /// Whether this player actually has a song.
    #[must_use]
    pub const fn has_song(&self) -> bool {
        self.backend.is_some()
    }

    /// Start the song from the beginning, replacing any current playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the song cannot be opened or decoded.
    pub fn play_from_start(&mut self) -> Result<(), FloodwatchError> {
        let Some(backend) = self.backend.as_mut() else {
            return Ok(());
        };

        // Dropping the previous sink stops it
        backend.sink = None;

        let file = File::open(&backend.song).map_err(|e| {
            FloodwatchError::Audio(format!("Failed to open {}: {e}", backend.song.display()))
        })?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| {
            FloodwatchError::Audio(format!("Failed to decode {}: {e}", backend.song.display()))
        })?;

        let sink = Sink::try_new(&backend.handle)
            .map_err(|e| FloodwatchError::Audio(format!("Failed to open audio sink: {e}")))?;
        sink.set_volume(backend.volume);
        sink.append(source);

        backend.sink = Some(sink);
        Ok(())
    }

    /// Stop playback.
    pub fn stop(&mut self) {
        if let Some(backend) = self.backend.as_mut() {
            if let Some(sink) = backend.sink.take() {
                sink.stop();
            }
        }
    }

    /// Whether the song is currently audible.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.backend
            .as_ref()
            .and_then(|b| b.sink.as_ref())
            .is_some_and(|sink| !sink.empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_player() {
        let mut player = MusicPlayer::silent();

        assert!(!player.has_song());
        assert!(!player.is_playing());
        // All operations are no-ops
        player.play_from_start().unwrap();
        player.stop();
    }

    #[test]
    fn test_missing_song_rejected() {
        let err = MusicPlayer::with_song(Path::new("/nonexistent/song.mp3"), 35).unwrap_err();
        assert!(matches!(err, FloodwatchError::NotFound(_)));
    }
}
