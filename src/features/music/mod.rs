//! Background music synchronized to runs.

mod library;
mod player;

pub use library::{relative_display, scan_library};
pub use player::MusicPlayer;
