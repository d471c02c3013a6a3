use clap::Parser;
use std::path::PathBuf;

use crate::theme::DEFAULT_THEME_PATH;

/// Advanced Media Player - video playback with subtitle and code-extraction tools
#[derive(Debug, Clone, Parser)]
#[command(name = "media-deck")]
#[command(version)]
#[command(about, long_about = None)]
pub struct Config {
    /// Video file to open at startup
    pub file: Option<PathBuf>,

    /// Theme file (JSON)
    #[arg(long, default_value = DEFAULT_THEME_PATH)]
    pub theme: PathBuf,

    /// Initial volume, 0 to 100
    #[arg(long, default_value_t = 70, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub volume: u8,

    /// Directory snapshots are written to
    #[arg(long, default_value = ".")]
    pub snapshot_dir: PathBuf,

    /// Start with the side panel shown
    #[arg(long)]
    pub side_panel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: None,
            theme: PathBuf::from(DEFAULT_THEME_PATH),
            volume: 70,
            snapshot_dir: PathBuf::from("."),
            side_panel: false,
        }
    }
}

impl Config {
    /// Volume as the engine expects it
    pub fn volume_fraction(&self) -> f32 {
        f32::from(self.volume) / 100.0
    }
}
