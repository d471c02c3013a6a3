use egui::{Button, ComboBox, RichText, ScrollArea, TextEdit, Ui};

use crate::dialog::PlannedFeature;
use crate::engine::MediaEngine;
use crate::shell::{Shell, SideTab};

pub const PANEL_WIDTH: f32 = 350.0;

pub const CODE_LANGUAGES: &[&str] = &["Auto Detect", "Java", "Python", "JavaScript", "C++", "C#"];

/// Tabbed panel overlaid on the right edge of the video
#[derive(Default)]
pub struct SidePanel {
    code_language: usize,
}

impl SidePanel {
    pub fn show<E: MediaEngine>(&mut self, ui: &mut Ui, shell: &mut Shell<E>) {
        ui.horizontal_wrapped(|ui| {
            for tab in SideTab::ALL {
                if ui.selectable_label(shell.side_tab() == tab, tab.title()).clicked() {
                    shell.set_side_tab(tab);
                }
            }
        });
        ui.separator();

        match shell.side_tab() {
            SideTab::Playlist => Self::playlist(ui, shell),
            SideTab::Subtitles => Self::subtitles(ui, shell),
            SideTab::Code => self.code(ui, shell),
            SideTab::Info => Self::info(ui, shell),
        }
    }

    fn playlist<E: MediaEngine>(ui: &mut Ui, shell: &mut Shell<E>) {
        if shell.playlist().is_empty() {
            ui.centered_and_justified(|ui| ui.weak("No videos in playlist"));
            return;
        }

        let mut activate = None;
        ScrollArea::vertical().auto_shrink(false).show(ui, |ui| {
            let current = shell.playlist().current();
            for (index, entry) in shell.playlist().entries().iter().enumerate() {
                let response = ui
                    .selectable_label(current == Some(index), &entry.name)
                    .on_hover_text(entry.path.display().to_string());
                if response.double_clicked() {
                    activate = Some(index);
                }
            }
        });

        if let Some(index) = activate {
            let _ = shell.play_entry(index);
        }
    }

    fn subtitles<E: MediaEngine>(ui: &mut Ui, shell: &mut Shell<E>) {
        ui.label(RichText::new("Generated Subtitles (ML)").strong());
        let mut text = "";
        ui.add_sized(
            [ui.available_width(), (ui.available_height() - 40.0).max(60.0)],
            TextEdit::multiline(&mut text)
                .hint_text("Subtitles will appear here after ML generation..."),
        );
        ui.horizontal(|ui| {
            if ui.button("🤖 Generate Subtitles").clicked() {
                shell.show_planned_feature(PlannedFeature::Subtitles);
            }
            ui.add_enabled(false, Button::new("💾 Export SRT"));
        });
    }

    fn code<E: MediaEngine>(&mut self, ui: &mut Ui, shell: &mut Shell<E>) {
        ui.label(RichText::new("Extracted Code (OCR)").strong());
        let mut text = "";
        ui.add_sized(
            [ui.available_width(), (ui.available_height() - 40.0).max(60.0)],
            TextEdit::multiline(&mut text)
                .code_editor()
                .hint_text("Extracted code will appear here..."),
        );
        ui.horizontal(|ui| {
            if ui.button("🔍 Extract Code").clicked() {
                shell.show_planned_feature(PlannedFeature::CodeExtraction);
            }
            ui.add_enabled(false, Button::new("💾 Export Code"));
            ComboBox::from_id_salt("code_language")
                .selected_text(CODE_LANGUAGES[self.code_language])
                .show_index(ui, &mut self.code_language, CODE_LANGUAGES.len(), |i| {
                    CODE_LANGUAGES[i]
                });
        });
    }

    fn info<E: MediaEngine>(ui: &mut Ui, shell: &Shell<E>) {
        ui.label(RichText::new("Video Information").strong().size(14.0));
        let info = shell.media_info_text();
        let mut text = info.as_str();
        ui.add_sized(
            ui.available_size(),
            TextEdit::multiline(&mut text),
        );
    }
}
