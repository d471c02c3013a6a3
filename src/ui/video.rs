use egui::{Color32, ScrollArea, Ui, Vec2};

use crate::player::FfmpegEngine;

/// How the frame is sized inside the video area
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DisplayMode {
    FitToWindow,
    NativeSize,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::FitToWindow => Self::NativeSize,
            Self::NativeSize => Self::FitToWindow,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::FitToWindow => "⛶",
            Self::NativeSize => "⊞",
        }
    }
}

/// Largest size with the video's aspect ratio that fits in `available`
pub fn fit_size(video: (u32, u32), available: Vec2) -> Vec2 {
    if video.0 == 0 || video.1 == 0 || available.y <= 0.0 {
        return Vec2::ZERO;
    }
    let aspect = video.0 as f32 / video.1 as f32;
    let available_aspect = available.x / available.y;

    if aspect > available_aspect {
        Vec2::new(available.x, available.x / aspect)
    } else {
        Vec2::new(available.y * aspect, available.y)
    }
}

pub struct VideoSurface;

impl VideoSurface {
    /// Draw the current frame, or the empty-state prompt when nothing is
    /// loaded. Returns true when the prompt's open button was clicked.
    pub fn show(
        ui: &mut Ui,
        engine: &FfmpegEngine,
        mode: &mut DisplayMode,
        background: Color32,
    ) -> bool {
        ui.painter().rect_filled(ui.max_rect(), 0.0, background);

        let (Some(texture), Some(video_size)) = (engine.texture(), engine.video_size()) else {
            return Self::empty(ui);
        };
        let texture_id = texture.id();

        let response = match *mode {
            DisplayMode::FitToWindow => {
                let display_size = fit_size(video_size, ui.available_size());
                ui.centered_and_justified(|ui| ui.image((texture_id, display_size)))
                    .inner
            }
            DisplayMode::NativeSize => {
                ScrollArea::both()
                    .show(ui, |ui| {
                        ui.image((
                            texture_id,
                            Vec2::new(video_size.0 as f32, video_size.1 as f32),
                        ))
                    })
                    .inner
            }
        };

        if response.double_clicked() {
            *mode = mode.toggled();
        }
        false
    }

    fn empty(ui: &mut Ui) -> bool {
        let mut open = false;
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 3.0);
            ui.heading("No video loaded");
            ui.add_space(10.0);
            if ui.button("Open Video File...").clicked() {
                open = true;
            }
            ui.add_space(10.0);
            ui.label("Or drag and drop a video file");
        });
        open
    }
}
