use crossbeam_channel::{unbounded, Sender};
use media_deck::config::Config;
use media_deck::dialog::{DialogKind, PlannedFeature};
use media_deck::engine::{EngineEvent, MediaEngine, MediaInfo, Snapshot};
use media_deck::error::LoadError;
use media_deck::shell::{Shell, SideTab, READY_STATUS};
use media_deck::transport::{TransportState, PAUSE_LABEL, PLAY_LABEL};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Load(PathBuf),
    Play,
    Pause,
    Stop,
    Seek(f64),
    Volume(f32),
    Release,
}

/// Engine double that records every request and reports events like the
/// real engine does.
struct RecordingEngine {
    calls: Vec<Call>,
    events: Sender<EngineEvent>,
    playing: bool,
    volume: f32,
    loaded: bool,
    duration: f64,
}

impl RecordingEngine {
    fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl MediaEngine for RecordingEngine {
    fn load_paused(&mut self, path: &Path) -> Result<MediaInfo, LoadError> {
        self.calls.push(Call::Load(path.to_path_buf()));
        let name = path.file_name().unwrap().to_string_lossy();
        if name.starts_with("missing") {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        if name.ends_with(".txt") {
            return Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: "no video stream found".into(),
            });
        }
        self.loaded = true;
        self.playing = false;
        // Live captures report no duration
        self.duration = if name.starts_with("live") { 0.0 } else { 90.0 };
        Ok(MediaInfo {
            path: path.to_path_buf(),
            width: 1280,
            height: 720,
            duration: self.duration,
            codec: Some("h264".into()),
            frame_rate: Some(25.0),
            has_audio: true,
            sample_rate: 48_000,
            channels: 2,
        })
    }

    fn play(&mut self) {
        self.calls.push(Call::Play);
        self.playing = true;
        self.events.send(EngineEvent::Playing).unwrap();
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
        self.playing = false;
        self.events.send(EngineEvent::Paused).unwrap();
    }

    fn stop(&mut self) {
        self.calls.push(Call::Stop);
        self.playing = false;
        self.events.send(EngineEvent::Stopped).unwrap();
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn seek(&mut self, seconds: f64) {
        self.calls.push(Call::Seek(seconds));
    }

    fn position(&self) -> f64 {
        10.0
    }

    fn duration(&self) -> f64 {
        if self.loaded {
            self.duration
        } else {
            0.0
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(Call::Volume(volume));
        self.volume = volume;
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn snapshot(&self) -> Option<Snapshot> {
        self.loaded.then(|| Snapshot {
            rgba: vec![255; 2 * 2 * 4],
            width: 2,
            height: 2,
            pts: 10.0,
        })
    }

    fn release(&mut self) {
        self.calls.push(Call::Release);
        self.loaded = false;
    }
}

fn shell_with(config: Config) -> Shell<RecordingEngine> {
    let (tx, rx) = unbounded();
    let engine = RecordingEngine {
        calls: Vec::new(),
        events: tx,
        playing: false,
        volume: 1.0,
        loaded: false,
        duration: 0.0,
    };
    let mut shell = Shell::new(engine, rx, &config);
    shell.engine_mut().take_calls();
    shell
}

fn shell() -> Shell<RecordingEngine> {
    shell_with(Config::default())
}

#[test]
fn test_initial_state() {
    let shell = shell();
    assert!(!shell.transport().is_enabled());
    assert!(shell.playlist().is_empty());
    assert!(shell.media().is_none());
    assert!(!shell.side_panel_visible());
    assert_eq!(shell.side_tab(), SideTab::Playlist);
    assert_eq!(shell.status(), READY_STATUS);
    assert_eq!(shell.transport().toggle_label(), PLAY_LABEL);
    assert!(shell.media_info_text().starts_with("File: Not loaded"));
}

#[test]
fn test_config_applies_volume() {
    let config = Config {
        volume: 40,
        side_panel: true,
        ..Config::default()
    };
    let shell = shell_with(config);
    assert_eq!(shell.volume(), 0.4);
    assert!(shell.side_panel_visible());
}

#[test]
fn test_successful_load_enables_transport_and_appends_entry() {
    let mut shell = shell();
    let path = PathBuf::from("/videos/lecture.mp4");

    shell.open_media(path.clone()).unwrap();

    assert_eq!(shell.engine_mut().take_calls(), vec![Call::Load(path.clone())]);
    assert!(shell.transport().is_enabled());
    assert_eq!(shell.transport().state(), TransportState::Paused);
    let names: Vec<_> = shell.playlist().entries().iter().map(|e| e.name.clone()).collect();
    assert_eq!(names, ["lecture.mp4"]);
    assert_eq!(shell.playlist().current(), Some(0));
    assert_eq!(shell.status(), "Loaded: lecture.mp4");
    assert!(shell.dialog().is_none());

    let info = shell.media_info_text();
    assert!(info.contains("File: lecture.mp4"));
    assert!(info.contains("Resolution: 1280x720"));
    assert!(info.contains("Frame Rate: 25.00 fps"));
}

#[test]
fn test_failed_load_keeps_controls_disabled() {
    let mut shell = shell();

    let err = shell.open_media(PathBuf::from("/videos/missing.mp4")).unwrap_err();

    assert!(matches!(err, LoadError::NotFound(_)));
    assert!(!shell.transport().is_enabled());
    assert!(shell.playlist().is_empty());
    let dialog = shell.dialog().expect("load failure is surfaced");
    assert_eq!(dialog.kind, DialogKind::Error);
    assert!(dialog.body.contains("file not found"));
    assert_eq!(shell.status(), "Failed to open missing.mp4");
}

#[test]
fn test_failed_load_keeps_previous_media() {
    let mut shell = shell();
    shell.open_media(PathBuf::from("a.mp4")).unwrap();
    shell.toggle_play_pause();
    shell.pump_events();

    assert!(shell.open_media(PathBuf::from("notes.txt")).is_err());

    assert_eq!(shell.playlist().len(), 1);
    assert_eq!(shell.media().unwrap().display_name(), "a.mp4");
    assert_eq!(shell.transport().state(), TransportState::Playing);
}

#[test]
fn test_toggle_issues_opposite_of_engine_state() {
    let mut shell = shell();
    shell.open_media(PathBuf::from("clip.mkv")).unwrap();
    shell.engine_mut().take_calls();

    shell.toggle_play_pause();
    shell.pump_events();
    assert_eq!(shell.engine_mut().take_calls(), vec![Call::Play]);
    assert!(shell.engine().is_playing());
    assert_eq!(shell.transport().toggle_label(), PAUSE_LABEL);

    shell.toggle_play_pause();
    shell.pump_events();
    assert_eq!(shell.engine_mut().take_calls(), vec![Call::Pause]);
    assert_eq!(shell.transport().toggle_label(), PLAY_LABEL);
}

#[test]
fn test_toggle_without_media_does_nothing() {
    let mut shell = shell();
    shell.toggle_play_pause();
    shell.stop();
    shell.seek(5.0);
    assert!(shell.engine_mut().take_calls().is_empty());
}

#[test]
fn test_stop_always_resets_label() {
    let mut shell = shell();
    shell.open_media(PathBuf::from("clip.mkv")).unwrap();

    shell.stop();
    shell.pump_events();
    assert_eq!(shell.transport().toggle_label(), PLAY_LABEL);

    shell.toggle_play_pause();
    shell.pump_events();
    assert_eq!(shell.transport().toggle_label(), PAUSE_LABEL);

    shell.engine_mut().take_calls();
    shell.stop();
    shell.pump_events();
    assert_eq!(shell.engine_mut().take_calls(), vec![Call::Stop]);
    assert_eq!(shell.transport().toggle_label(), PLAY_LABEL);
}

#[test]
fn test_end_of_stream_pauses_transport() {
    let mut shell = shell();
    shell.open_media(PathBuf::from("short.mp4")).unwrap();
    shell.toggle_play_pause();
    shell.pump_events();

    shell.engine().events.send(EngineEvent::EndReached).unwrap();
    shell.pump_events();

    assert_eq!(shell.transport().state(), TransportState::Paused);
    assert_eq!(shell.status(), "Finished: short.mp4");
}

#[test]
fn test_events_from_previous_media_are_ignored() {
    let mut shell = shell();
    shell.open_media(PathBuf::from("a.mp4")).unwrap();
    shell.toggle_play_pause();
    shell
        .engine()
        .events
        .send(EngineEvent::Error("decoder gave up on a.mp4".into()))
        .unwrap();

    // Loaded in the same UI frame, before the events above were pumped
    shell.open_media(PathBuf::from("b.mp4")).unwrap();
    shell.pump_events();

    assert_eq!(shell.transport().state(), TransportState::Paused);
    assert!(!shell.engine().is_playing());
    assert_eq!(shell.status(), "Loaded: b.mp4");

    shell.engine_mut().take_calls();
    shell.toggle_play_pause();
    assert_eq!(shell.engine_mut().take_calls(), vec![Call::Play]);
}

#[test]
fn test_engine_error_is_reported() {
    let mut shell = shell();
    shell.open_media(PathBuf::from("broken.mp4")).unwrap();
    shell.toggle_play_pause();
    shell.engine().events.send(EngineEvent::Error("corrupt stream".into())).unwrap();
    shell.pump_events();

    assert!(!shell.transport().is_playing());
    assert_eq!(shell.status(), "Playback error: corrupt stream");
}

#[test]
fn test_placeholder_dialogs_have_no_side_effects() {
    for feature in [PlannedFeature::Subtitles, PlannedFeature::CodeExtraction] {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_with(Config {
            snapshot_dir: dir.path().to_path_buf(),
            ..Config::default()
        });
        shell.open_media(PathBuf::from("talk.mp4")).unwrap();
        shell.engine_mut().take_calls();
        let status = shell.status().to_owned();

        shell.show_planned_feature(feature);

        let dialog = shell.dialog().unwrap();
        assert_eq!(dialog.kind, DialogKind::Info);
        assert!(dialog.body.contains("Implementation coming in next phase!"));
        assert!(shell.engine_mut().take_calls().is_empty());
        assert_eq!(shell.status(), status);
        assert_eq!(shell.playlist().len(), 1);
        assert_eq!(shell.transport().state(), TransportState::Paused);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        shell.dismiss_dialog();
        assert!(shell.dialog().is_none());
    }
}

#[test]
fn test_next_and_previous_walk_playlist() {
    let mut shell = shell();
    shell.open_media(PathBuf::from("one.mp4")).unwrap();
    shell.open_media(PathBuf::from("two.mp4")).unwrap();
    shell.engine_mut().take_calls();

    shell.next();
    assert!(shell.engine_mut().take_calls().is_empty());

    shell.previous();
    assert_eq!(
        shell.engine_mut().take_calls(),
        vec![Call::Load(PathBuf::from("one.mp4"))]
    );
    assert_eq!(shell.playlist().current(), Some(0));
    assert_eq!(shell.playlist().len(), 2);

    shell.next();
    assert_eq!(shell.playlist().current(), Some(1));
}

#[test]
fn test_open_folder_queues_videos() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["b.mp4", "a.mkv", "cover.jpg"] {
        std::fs::write(dir.path().join(name), b"").unwrap();
    }
    let mut shell = shell();

    assert_eq!(shell.open_folder(dir.path()), 2);

    let names: Vec<_> = shell.playlist().entries().iter().map(|e| e.name.clone()).collect();
    assert_eq!(names, ["a.mkv", "b.mp4"]);
    assert_eq!(shell.playlist().current(), Some(0));
    assert_eq!(shell.media().unwrap().display_name(), "a.mkv");
}

#[test]
fn test_open_folder_skips_unopenable_files() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["missing-header.mp4", "missing-index.avi", "ok.mkv"] {
        std::fs::write(dir.path().join(name), b"").unwrap();
    }
    let mut shell = shell();

    assert_eq!(shell.open_folder(dir.path()), 3);

    let loads: Vec<_> = shell
        .engine_mut()
        .take_calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Load(_)))
        .collect();
    assert_eq!(loads.len(), 3);
    assert_eq!(shell.playlist().len(), 3);
    assert_eq!(shell.playlist().current(), Some(2));
    assert_eq!(shell.media().unwrap().display_name(), "ok.mkv");
    assert!(shell.transport().is_enabled());
    assert!(shell.dialog().is_none());
}

#[test]
fn test_open_folder_with_nothing_playable() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("missing.mp4"), b"").unwrap();
    let mut shell = shell();

    assert_eq!(shell.open_folder(dir.path()), 1);

    assert!(!shell.transport().is_enabled());
    assert_eq!(shell.playlist().current(), None);
    assert_eq!(shell.dialog().unwrap().kind, DialogKind::Error);
}

#[test]
fn test_open_missing_folder_surfaces_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut shell = shell();
    assert_eq!(shell.open_folder(&dir.path().join("nope")), 0);
    assert_eq!(shell.dialog().unwrap().kind, DialogKind::Error);
    assert!(shell.playlist().is_empty());
}

#[test]
fn test_seek_relative_is_clamped() {
    let mut shell = shell();
    shell.open_media(PathBuf::from("clip.mp4")).unwrap();
    shell.engine_mut().take_calls();

    shell.seek_relative(-30.0);
    shell.seek_relative(500.0);
    assert_eq!(
        shell.engine_mut().take_calls(),
        vec![Call::Seek(0.0), Call::Seek(90.0)]
    );
}

#[test]
fn test_seek_relative_without_known_duration() {
    let mut shell = shell();
    shell.open_media(PathBuf::from("live-capture.ts")).unwrap();
    shell.engine_mut().take_calls();

    shell.seek_relative(5.0);
    shell.seek_relative(-30.0);
    assert_eq!(
        shell.engine_mut().take_calls(),
        vec![Call::Seek(15.0), Call::Seek(0.0)]
    );
}

#[test]
fn test_mute_restores_volume() {
    let mut shell = shell();
    shell.set_volume(0.6);
    shell.toggle_mute();
    assert!(shell.is_muted());
    assert_eq!(shell.volume(), 0.0);
    shell.toggle_mute();
    assert!(!shell.is_muted());
    assert_eq!(shell.volume(), 0.6);
}

#[test]
fn test_snapshot_written_to_configured_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut shell = shell_with(Config {
        snapshot_dir: dir.path().to_path_buf(),
        ..Config::default()
    });
    assert!(shell.take_snapshot().is_none());

    shell.open_media(PathBuf::from("/v/demo.mp4")).unwrap();
    let written = shell.take_snapshot().unwrap();

    assert_eq!(written, dir.path().join("snapshot-demo-00m10s.png"));
    assert!(written.exists());
    assert!(shell.status().starts_with("Snapshot saved"));
}

#[test]
fn test_side_panel_toggle() {
    let mut shell = shell();
    shell.toggle_side_panel();
    assert!(shell.side_panel_visible());
    shell.set_side_tab(SideTab::Info);
    shell.toggle_side_panel();
    assert!(!shell.side_panel_visible());
    assert_eq!(shell.side_tab(), SideTab::Info);
}

#[test]
fn test_shutdown_releases_engine() {
    let mut shell = shell();
    shell.open_media(PathBuf::from("clip.mp4")).unwrap();
    shell.engine_mut().take_calls();

    shell.shutdown();

    assert_eq!(shell.engine_mut().take_calls(), vec![Call::Release]);
    assert!(!shell.transport().is_enabled());
}
