use std::path::{Path, PathBuf};

use crate::error::LoadError;

/// Information about a loaded media item
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Duration in seconds, 0.0 when unknown
    pub duration: f64,
    pub codec: Option<String>,
    pub frame_rate: Option<f64>,
    pub has_audio: bool,
    pub sample_rate: u32,
    pub channels: u16,
}

impl MediaInfo {
    /// File name shown in the playlist and status line
    pub fn display_name(&self) -> String {
        display_name(&self.path)
    }
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Notifications pushed by the engine, possibly from its own threads
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Playing,
    Paused,
    Stopped,
    EndReached,
    Error(String),
}

/// An RGBA copy of the frame currently on screen
#[derive(Clone)]
pub struct Snapshot {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Presentation time in seconds
    pub pts: f64,
}

/// Transport and load API the window shell drives.
///
/// Calls are fire-and-forget requests; the engine reports state changes
/// through [`EngineEvent`]s rather than return values.
pub trait MediaEngine {
    /// Open `path` and show its first frame without starting playback.
    fn load_paused(&mut self, path: &Path) -> Result<MediaInfo, LoadError>;

    fn play(&mut self);

    fn pause(&mut self);

    /// Stop playback and rewind to the start.
    fn stop(&mut self);

    fn is_playing(&self) -> bool;

    fn seek(&mut self, seconds: f64);

    /// Current position in seconds
    fn position(&self) -> f64;

    fn duration(&self) -> f64;

    /// Set volume (0.0 to 1.0)
    fn set_volume(&mut self, volume: f32);

    fn volume(&self) -> f32;

    fn snapshot(&self) -> Option<Snapshot>;

    /// Drop the loaded media and stop all engine threads.
    fn release(&mut self);
}
