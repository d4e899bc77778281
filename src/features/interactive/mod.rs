//! Interactive prompts for the watch command.

mod picker;

pub use picker::{confirm, pick_map, pick_song, prompt_volume, MapChoice};
