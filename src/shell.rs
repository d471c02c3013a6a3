//! Session state of the player window, independent of rendering.
//!
//! Every user action funnels through [`Shell`], which issues at most one
//! engine request per action and keeps the transport, playlist, status line
//! and dialogs consistent with each other.

use crossbeam_channel::Receiver;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::dialog::{InfoDialog, PlannedFeature};
use crate::engine::{display_name, EngineEvent, MediaEngine, MediaInfo};
use crate::error::LoadError;
use crate::playlist::{scan_folder, Playlist};
use crate::snapshot;
use crate::transport::{Transport, TransportCommand};

pub const READY_STATUS: &str = "Ready - Open a video file to start";

/// Step for keyboard volume changes
pub const VOLUME_STEP: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideTab {
    Playlist,
    Subtitles,
    Code,
    Info,
}

impl SideTab {
    pub const ALL: [SideTab; 4] = [Self::Playlist, Self::Subtitles, Self::Code, Self::Info];

    pub fn title(self) -> &'static str {
        match self {
            Self::Playlist => "📋 Playlist",
            Self::Subtitles => "💬 Subtitles",
            Self::Code => "</> Code Extract",
            Self::Info => "ℹ Info",
        }
    }
}

pub struct Shell<E: MediaEngine> {
    engine: E,
    events: Receiver<EngineEvent>,
    transport: Transport,
    playlist: Playlist,
    media: Option<MediaInfo>,
    side_panel_visible: bool,
    side_tab: SideTab,
    status: String,
    dialog: Option<InfoDialog>,
    /// Volume to restore when unmuting
    muted_volume: Option<f32>,
    snapshot_dir: PathBuf,
}

impl<E: MediaEngine> Shell<E> {
    pub fn new(mut engine: E, events: Receiver<EngineEvent>, config: &Config) -> Self {
        engine.set_volume(config.volume_fraction());
        Self {
            engine,
            events,
            transport: Transport::new(),
            playlist: Playlist::new(),
            media: None,
            side_panel_visible: config.side_panel,
            side_tab: SideTab::Playlist,
            status: READY_STATUS.to_owned(),
            dialog: None,
            muted_volume: None,
            snapshot_dir: config.snapshot_dir.clone(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn media(&self) -> Option<&MediaInfo> {
        self.media.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }

    /// Apply engine notifications queued since the last call
    pub fn pump_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            tracing::trace!(?event, "engine event");
            self.transport.on_event(&event);
            match event {
                EngineEvent::EndReached => {
                    if let Some(media) = &self.media {
                        self.status = format!("Finished: {}", media.display_name());
                    }
                }
                EngineEvent::Error(message) => {
                    tracing::error!("playback error: {}", message);
                    self.status = format!("Playback error: {}", message);
                }
                EngineEvent::Playing | EngineEvent::Paused | EngineEvent::Stopped => {}
            }
        }
    }

    /// Drop queued events; they describe media that is no longer loaded
    fn discard_events(&mut self) {
        for event in self.events.try_iter() {
            tracing::trace!(?event, "discarding event from previous media");
        }
    }

    fn load(&mut self, path: &Path) -> Result<(), LoadError> {
        match self.engine.load_paused(path) {
            Ok(info) => {
                self.discard_events();
                self.status = format!("Loaded: {}", info.display_name());
                self.media = Some(info);
                self.transport.media_loaded();
                Ok(())
            }
            Err(e) => {
                let name = display_name(path);
                tracing::warn!(path = %path.display(), "error loading video: {}", e);
                self.status = format!("Failed to open {}", name);
                self.dialog = Some(InfoDialog::error(
                    "Open Video File",
                    &format!("Could not open {}", name),
                    e.to_string(),
                ));
                Err(e)
            }
        }
    }

    /// Load a new file and append it to the playlist.
    ///
    /// On failure nothing changes except the status line and an error
    /// dialog; the previously loaded media stays loaded.
    pub fn open_media(&mut self, path: PathBuf) -> Result<(), LoadError> {
        self.load(&path)?;
        let index = self.playlist.push(path);
        self.playlist.select(index);
        Ok(())
    }

    /// Load an entry already in the playlist
    pub fn play_entry(&mut self, index: usize) -> Result<(), LoadError> {
        let Some(path) = self.playlist.get(index).map(|e| e.path.clone()) else {
            return Ok(());
        };
        self.load(&path)?;
        self.playlist.select(index);
        Ok(())
    }

    /// Queue every video in `dir` and load the first one that opens.
    /// Returns the number of files queued.
    pub fn open_folder(&mut self, dir: &Path) -> usize {
        let files = match scan_folder(dir) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), "cannot read folder: {}", e);
                self.status = format!("Cannot read folder {}", dir.display());
                self.dialog = Some(InfoDialog::error(
                    "Open Folder",
                    "Could not read folder",
                    e.to_string(),
                ));
                return 0;
            }
        };

        if files.is_empty() {
            self.status = format!("No video files in {}", dir.display());
            return 0;
        }

        let count = files.len();
        let first = self.playlist.len();
        for path in files {
            self.playlist.push(path);
        }
        tracing::info!(dir = %dir.display(), count, "queued folder");

        for index in first..first + count {
            if self.play_entry(index).is_ok() {
                if index > first {
                    // Earlier entries failed to open
                    self.dialog = None;
                    tracing::info!(skipped = index - first, "opened first playable file");
                }
                break;
            }
        }
        count
    }

    pub fn next(&mut self) {
        if let Some(index) = self.playlist.next_index() {
            let _ = self.play_entry(index);
        }
    }

    pub fn previous(&mut self) {
        if let Some(index) = self.playlist.previous_index() {
            let _ = self.play_entry(index);
        }
    }

    pub fn toggle_play_pause(&mut self) {
        match self.transport.toggle() {
            Some(TransportCommand::Play) => self.engine.play(),
            Some(TransportCommand::Pause) => self.engine.pause(),
            None => {}
        }
    }

    pub fn stop(&mut self) {
        if self.transport.stop() {
            self.engine.stop();
        }
    }

    pub fn seek(&mut self, seconds: f64) {
        if self.transport.is_enabled() {
            self.engine.seek(seconds.max(0.0));
        }
    }

    pub fn seek_relative(&mut self, delta: f64) {
        let mut target = self.engine.position() + delta;
        let duration = self.engine.duration();
        if duration > 0.0 {
            target = target.min(duration);
        }
        self.seek(target);
    }

    pub fn volume(&self) -> f32 {
        self.engine.volume()
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.muted_volume = None;
        self.engine.set_volume(volume.clamp(0.0, 1.0));
    }

    pub fn is_muted(&self) -> bool {
        self.muted_volume.is_some()
    }

    pub fn toggle_mute(&mut self) {
        match self.muted_volume.take() {
            Some(previous) => self.engine.set_volume(previous),
            None => {
                self.muted_volume = Some(self.engine.volume());
                self.engine.set_volume(0.0);
            }
        }
    }

    /// Save the frame on screen as PNG, returning the file written
    pub fn take_snapshot(&mut self) -> Option<PathBuf> {
        let media = self.media.as_ref()?;
        let Some(frame) = self.engine.snapshot() else {
            self.status = "No frame to capture yet".to_owned();
            return None;
        };
        match snapshot::save_png(&frame, &self.snapshot_dir, &media.path) {
            Ok(path) => {
                self.status = format!("Snapshot saved: {}", path.display());
                Some(path)
            }
            Err(e) => {
                tracing::warn!("snapshot failed: {}", e);
                self.status = format!("Snapshot failed: {}", e);
                None
            }
        }
    }

    pub fn show_planned_feature(&mut self, feature: PlannedFeature) {
        self.dialog = Some(feature.dialog());
    }

    pub fn show_dialog(&mut self, dialog: InfoDialog) {
        self.dialog = Some(dialog);
    }

    pub fn dialog(&self) -> Option<&InfoDialog> {
        self.dialog.as_ref()
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    pub fn side_panel_visible(&self) -> bool {
        self.side_panel_visible
    }

    pub fn toggle_side_panel(&mut self) {
        self.side_panel_visible = !self.side_panel_visible;
    }

    pub fn side_tab(&self) -> SideTab {
        self.side_tab
    }

    pub fn set_side_tab(&mut self, tab: SideTab) {
        self.side_tab = tab;
    }

    /// Text for the Info tab
    pub fn media_info_text(&self) -> String {
        let Some(info) = &self.media else {
            return "File: Not loaded\nDuration: --\nResolution: --\nCodec: --\nFrame Rate: --"
                .to_owned();
        };
        let frame_rate = info
            .frame_rate
            .map_or_else(|| "--".to_owned(), |fps| format!("{:.2} fps", fps));
        format!(
            "File: {}\nDuration: {}\nResolution: {}x{}\nCodec: {}\nFrame Rate: {}\nAudio: {}",
            info.display_name(),
            format_time(info.duration),
            info.width,
            info.height,
            info.codec.as_deref().unwrap_or("--"),
            frame_rate,
            if info.has_audio {
                format!("{} Hz, {} ch", info.sample_rate, info.channels)
            } else {
                "none".to_owned()
            },
        )
    }

    /// Release the engine; called once on window teardown
    pub fn shutdown(&mut self) {
        self.engine.release();
        self.transport.media_unloaded();
        self.media = None;
    }
}

pub fn format_time(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0) as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
