use egui::{Button, Color32, RichText, Slider, Ui, ViewportCommand};

use super::video::DisplayMode;
use crate::engine::MediaEngine;
use crate::player::FfmpegEngine;
use crate::shell::{format_time, Shell};

/// Bottom control panel: seek row, transport buttons, status line.
pub struct PlayerControls;

impl PlayerControls {
    pub fn show(ui: &mut Ui, shell: &mut Shell<FfmpegEngine>, display_mode: &mut DisplayMode) {
        let enabled = shell.transport().is_enabled();

        Self::seek_row(ui, shell, enabled);
        ui.add_space(4.0);

        ui.horizontal(|ui| {
            let has_previous = shell.playlist().previous_index().is_some();
            if ui
                .add_enabled(enabled && has_previous, Button::new("⏮ Prev"))
                .clicked()
            {
                shell.previous();
            }

            if ui
                .add_enabled(
                    enabled,
                    Button::new(shell.transport().toggle_label()).min_size([100.0, 28.0].into()),
                )
                .clicked()
            {
                shell.toggle_play_pause();
            }

            if ui
                .add_enabled(enabled, Button::new("⬛ Stop").min_size([100.0, 28.0].into()))
                .clicked()
            {
                shell.stop();
            }

            let has_next = shell.playlist().next_index().is_some();
            if ui
                .add_enabled(enabled && has_next, Button::new("⏭ Next"))
                .clicked()
            {
                shell.next();
            }

            ui.separator();

            let mute_glyph = if shell.is_muted() { "🔇" } else { "🔊" };
            if ui.add_enabled(enabled, Button::new(mute_glyph).frame(false)).clicked() {
                shell.toggle_mute();
            }
            let mut volume = shell.volume() * 100.0;
            ui.spacing_mut().slider_width = 120.0;
            if ui
                .add_enabled(enabled, Slider::new(&mut volume, 0.0..=100.0).show_value(false))
                .changed()
            {
                shell.set_volume(volume / 100.0);
            }

            ui.separator();

            if ui.add_enabled(enabled, Button::new("📷 Snapshot")).clicked() {
                shell.take_snapshot();
            }

            let fullscreen = ui.ctx().input(|i| i.viewport().fullscreen.unwrap_or(false));
            if ui.add_enabled(enabled, Button::new("⛶ Fullscreen")).clicked() {
                ui.ctx()
                    .send_viewport_cmd(ViewportCommand::Fullscreen(!fullscreen));
            }

            if ui
                .add_enabled(enabled, Button::new(display_mode.glyph()))
                .on_hover_text("Toggle display mode (double-click video)")
                .clicked()
            {
                *display_mode = display_mode.toggled();
            }
        });

        ui.label(RichText::new(shell.status()).size(11.0).color(Color32::GRAY));
    }

    fn seek_row(ui: &mut Ui, shell: &mut Shell<FfmpegEngine>, enabled: bool) {
        ui.horizontal(|ui| {
            let duration = shell.engine().duration();
            let player_position = shell.engine().position();
            let time_label = format!("{} / {}", format_time(player_position), format_time(duration));

            // Slider keeps the dragged value until the seek lands
            let slider_id = ui.id().with("seek_slider");
            let mut position = ui.memory(|mem| {
                mem.data.get_temp::<f64>(slider_id).unwrap_or(player_position)
            });

            ui.spacing_mut().slider_width = (ui.available_width() - 120.0).max(50.0);
            let slider_response = ui.add_enabled(
                enabled,
                Slider::new(&mut position, 0.0..=duration.max(0.0))
                    .show_value(false)
                    .trailing_fill(true),
            );

            if slider_response.dragged() {
                ui.memory_mut(|mem| mem.data.insert_temp(slider_id, position));
            } else if !shell.engine().is_seeking() {
                ui.memory_mut(|mem| mem.data.insert_temp(slider_id, player_position));
            }

            if slider_response.drag_stopped() || slider_response.clicked() {
                shell.seek(position);
            }

            ui.monospace(time_label);
        });
    }
}
