use egui::{Color32, Context, Stroke, Visuals};
use serde::Deserialize;
use std::path::Path;

use crate::error::ThemeError;

pub const DEFAULT_THEME_PATH: &str = "assets/theme.json";

/// On-disk theme: every field optional, colours as `#rrggbb`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ThemeFile {
    dark: Option<bool>,
    accent: Option<String>,
    panel: Option<String>,
    window: Option<String>,
    text: Option<String>,
    video_background: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub dark: bool,
    pub accent: Color32,
    pub panel: Color32,
    pub window: Color32,
    pub text: Color32,
    pub video_background: Color32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            dark: true,
            accent: Color32::from_rgb(255, 160, 50),
            panel: Color32::from_rgb(20, 20, 24),
            window: Color32::from_rgb(28, 28, 34),
            text: Color32::from_rgb(220, 220, 230),
            video_background: Color32::BLACK,
        }
    }
}

impl Theme {
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        let file: ThemeFile = serde_json::from_str(json)?;
        let base = Self::default();
        let color = |value: Option<String>, fallback: Color32| match value {
            Some(hex) => parse_hex(&hex),
            None => Ok(fallback),
        };
        Ok(Self {
            dark: file.dark.unwrap_or(base.dark),
            accent: color(file.accent, base.accent)?,
            panel: color(file.panel, base.panel)?,
            window: color(file.window, base.window)?,
            text: color(file.text, base.text)?,
            video_background: color(file.video_background, base.video_background)?,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ThemeError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load the theme file, falling back to the built-in theme on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(theme) => {
                tracing::debug!(path = %path.display(), "loaded theme");
                theme
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "theme not loaded, using default styling: {}", e);
                Self::default()
            }
        }
    }

    pub fn apply(&self, ctx: &Context) {
        let mut v = if self.dark {
            Visuals::dark()
        } else {
            Visuals::light()
        };
        v.panel_fill = self.panel;
        v.window_fill = self.window;
        v.selection.bg_fill = self.accent;
        v.hyperlink_color = self.accent;
        v.widgets.hovered.bg_stroke = Stroke::new(1.0, self.accent);
        v.widgets.active.bg_stroke = Stroke::new(1.0, self.accent);
        v.override_text_color = Some(self.text);
        ctx.set_visuals(v);

        ctx.style_mut(|s| {
            s.spacing.item_spacing = egui::vec2(6.0, 5.0);
            s.spacing.button_padding = egui::vec2(10.0, 5.0);
        });
    }
}

fn parse_hex(value: &str) -> Result<Color32, ThemeError> {
    let invalid = || ThemeError::InvalidColor(value.to_owned());
    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}
