use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "floodwatch")]
#[command(about = "A screen-watching run companion for Flood Escape 2")]
#[command(long_about = "floodwatch - a run companion for Flood Escape 2

Watches the game on screen, detects run starts, deaths, and escapes from
on-screen text, plays background music synchronized to runs, and keeps
attempt/completion statistics per map and per session.

QUICK START:
  floodwatch watch            Pick a map and start watching
  floodwatch maps list        Show per-map statistics
  floodwatch sessions         Show recent watch sessions

Requires the Tesseract OCR binary and a screenshot tool on PATH (see
screen.capture_command and screen.tesseract_command in config.yaml).

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  floodwatch <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output (default),
    /// or 'json' for machine-readable output suitable for scripting.
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Watch the screen for runs on a map
    ///
    /// Selects a map (interactively, or via the MAP argument), optionally
    /// picks a song from the music library, then samples the screen until
    /// an escape is detected or you quit.
    ///
    /// While watching:
    ///   g    force-stop the current run (OCR missed the death screen)
    ///   c    force-complete the current run
    ///   m    stop watching and pick a different map
    ///   k    quit
    ///
    /// # Examples
    ///
    ///   floodwatch watch
    ///   floodwatch watch "Lost Woods"
    ///   floodwatch watch "Lost Woods" --no-music
    ///   floodwatch watch --volume 20
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Inspect and manage map statistics
    ///
    /// # Examples
    ///
    ///   floodwatch maps list
    ///   floodwatch maps show "Lost Woods"
    ///   floodwatch maps add "Lost Woods" --song ost/forest.ogg
    #[command(alias = "m")]
    Maps(MapsArgs),

    /// List recent watch sessions
    ///
    /// # Examples
    ///
    ///   floodwatch sessions
    ///   floodwatch sessions --map "Lost Woods" --limit 5
    #[command(alias = "s")]
    Sessions(SessionsArgs),
}

#[derive(Args)]
pub struct WatchArgs {
    /// Map to watch (created on first use); prompts when omitted
    pub map: Option<String>,

    /// Watch without music, skipping the song prompt
    #[arg(long)]
    pub no_music: bool,

    /// Playback volume 0-100, skipping the volume prompt
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: Option<u8>,
}

#[derive(Args)]
pub struct MapsArgs {
    #[command(subcommand)]
    pub command: MapCommands,
}

#[derive(Subcommand)]
pub enum MapCommands {
    /// List all maps with their totals
    #[command(alias = "ls")]
    List,

    /// Show one map's full statistics
    Show {
        /// Map name
        name: String,
    },

    /// Add a map without watching it
    Add {
        /// Map name
        name: String,
        /// Song to play on this map, relative to the music directory
        #[arg(long)]
        song: Option<String>,
    },
}

#[derive(Args)]
pub struct SessionsArgs {
    /// Only show sessions for this map
    #[arg(long)]
    pub map: Option<String>,

    /// Maximum number of sessions to show
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}
