use egui::{Context, Key};

/// Seek step for arrow keys, in seconds
pub const SEEK_STEP: f64 = 5.0;

/// Keyboard control handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    PlayPause,
    Stop,
    Seek(f64),
    VolumeUp,
    VolumeDown,
    Mute,
    Fullscreen,
    Next,
    Previous,
    ToggleSidePanel,
}

pub fn action_for_key(key: Key) -> Option<ControlAction> {
    let action = match key {
        Key::Space => ControlAction::PlayPause,
        Key::S => ControlAction::Stop,
        Key::ArrowLeft => ControlAction::Seek(-SEEK_STEP),
        Key::ArrowRight => ControlAction::Seek(SEEK_STEP),
        Key::ArrowUp => ControlAction::VolumeUp,
        Key::ArrowDown => ControlAction::VolumeDown,
        Key::M => ControlAction::Mute,
        Key::F => ControlAction::Fullscreen,
        Key::N => ControlAction::Next,
        Key::P => ControlAction::Previous,
        Key::Tab => ControlAction::ToggleSidePanel,
        _ => return None,
    };
    Some(action)
}

/// Actions for keys pressed this frame. Empty while a text field has focus.
pub fn read_shortcuts(ctx: &Context) -> Vec<ControlAction> {
    if ctx.wants_keyboard_input() {
        return Vec::new();
    }
    ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } if modifiers.is_none() => action_for_key(*key),
                _ => None,
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(action_for_key(Key::Space), Some(ControlAction::PlayPause));
        assert_eq!(action_for_key(Key::ArrowLeft), Some(ControlAction::Seek(-SEEK_STEP)));
        assert_eq!(action_for_key(Key::Tab), Some(ControlAction::ToggleSidePanel));
        assert_eq!(action_for_key(Key::Q), None);
    }
}
