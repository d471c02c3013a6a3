use crate::engine::EngineEvent;

pub const PLAY_LABEL: &str = "▶ Play";
pub const PAUSE_LABEL: &str = "⏸ Pause";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    /// Nothing loaded; controls are disabled
    Unloaded,
    Paused,
    Playing,
}

/// Request the transport wants issued to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCommand {
    Play,
    Pause,
}

/// Play/pause state owned by the application.
///
/// User intent moves the state immediately; engine events then confirm or
/// correct it (end of stream, decoder errors, external pauses).
#[derive(Debug, Clone)]
pub struct Transport {
    state: TransportState,
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport {
    pub fn new() -> Self {
        Self {
            state: TransportState::Unloaded,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    /// Controls are usable only while a media item is loaded
    pub fn is_enabled(&self) -> bool {
        self.state != TransportState::Unloaded
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    /// A load succeeded; the engine starts paused.
    pub fn media_loaded(&mut self) {
        self.state = TransportState::Paused;
    }

    pub fn media_unloaded(&mut self) {
        self.state = TransportState::Unloaded;
    }

    /// Flip between playing and paused, returning the command to issue.
    pub fn toggle(&mut self) -> Option<TransportCommand> {
        match self.state {
            TransportState::Unloaded => None,
            TransportState::Playing => {
                self.state = TransportState::Paused;
                Some(TransportCommand::Pause)
            }
            TransportState::Paused => {
                self.state = TransportState::Playing;
                Some(TransportCommand::Play)
            }
        }
    }

    /// Returns false when there is nothing to stop.
    pub fn stop(&mut self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.state = TransportState::Paused;
        true
    }

    pub fn on_event(&mut self, event: &EngineEvent) {
        if self.state == TransportState::Unloaded {
            return;
        }
        self.state = match event {
            EngineEvent::Playing => TransportState::Playing,
            EngineEvent::Paused
            | EngineEvent::Stopped
            | EngineEvent::EndReached
            | EngineEvent::Error(_) => TransportState::Paused,
        };
    }

    /// Label for the play/pause button
    pub fn toggle_label(&self) -> &'static str {
        match self.state {
            TransportState::Playing => PAUSE_LABEL,
            _ => PLAY_LABEL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> Transport {
        let mut transport = Transport::new();
        transport.media_loaded();
        transport
    }

    #[test]
    fn test_starts_disabled() {
        let mut transport = Transport::new();
        assert!(!transport.is_enabled());
        assert_eq!(transport.toggle(), None);
        assert!(!transport.stop());
        assert_eq!(transport.toggle_label(), PLAY_LABEL);
    }

    #[test]
    fn test_toggle_alternates() {
        let mut transport = loaded();
        assert_eq!(transport.toggle(), Some(TransportCommand::Play));
        assert_eq!(transport.toggle_label(), PAUSE_LABEL);
        assert_eq!(transport.toggle(), Some(TransportCommand::Pause));
        assert_eq!(transport.toggle_label(), PLAY_LABEL);
    }

    #[test]
    fn test_stop_resets_label() {
        let mut transport = loaded();
        transport.toggle();
        assert!(transport.is_playing());
        assert!(transport.stop());
        assert_eq!(transport.toggle_label(), PLAY_LABEL);
        assert!(transport.stop());
        assert_eq!(transport.state(), TransportState::Paused);
    }

    #[test]
    fn test_engine_events_drive_state() {
        let mut transport = loaded();
        transport.on_event(&EngineEvent::Playing);
        assert!(transport.is_playing());
        transport.on_event(&EngineEvent::EndReached);
        assert_eq!(transport.state(), TransportState::Paused);
        transport.on_event(&EngineEvent::Playing);
        transport.on_event(&EngineEvent::Error("decoder died".into()));
        assert_eq!(transport.state(), TransportState::Paused);
    }

    #[test]
    fn test_events_ignored_when_unloaded() {
        let mut transport = Transport::new();
        transport.on_event(&EngineEvent::Playing);
        assert_eq!(transport.state(), TransportState::Unloaded);
    }
}
