use crossbeam_channel::unbounded;
use egui::{Area, CentralPanel, Frame, Id, Order, Pos2, Rect, TopBottomPanel, Vec2, ViewportCommand};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::dialog::{InfoDialog, PlannedFeature};
use crate::player::FfmpegEngine;
use crate::playlist::VIDEO_EXTENSIONS;
use crate::shell::{Shell, VOLUME_STEP};
use crate::theme::Theme;
use crate::ui::controls::PlayerControls;
use crate::ui::dialogs::show_info_dialog;
use crate::ui::menu::{MainMenu, MenuAction};
use crate::ui::shortcuts::{read_shortcuts, ControlAction};
use crate::ui::side_panel::{SidePanel, PANEL_WIDTH};
use crate::ui::video::{DisplayMode, VideoSurface};

pub const WINDOW_TITLE: &str = "Advanced Media Player - ML Subtitle & Code Extraction";

pub struct MediaPlayerApp {
    shell: Shell<FfmpegEngine>,
    theme: Theme,
    theme_path: PathBuf,
    display_mode: DisplayMode,
    side_panel: SidePanel,
    /// Present while the Settings window is open
    settings: Option<SettingsPaths>,
}

/// Paths shown in the Settings window, resolved once when it opens
struct SettingsPaths {
    snapshot_dir: String,
    theme: String,
}

impl SettingsPaths {
    fn resolve(snapshot_dir: &Path, theme: &Path) -> Self {
        Self {
            snapshot_dir: display_path(snapshot_dir),
            theme: display_path(theme),
        }
    }
}

impl MediaPlayerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        let theme = Theme::load_or_default(&config.theme);
        theme.apply(&cc.egui_ctx);

        let (events, event_receiver) = unbounded();
        let engine = FfmpegEngine::new(cc.egui_ctx.clone(), events);
        let mut shell = Shell::new(engine, event_receiver, &config);

        if let Some(path) = config.file.clone() {
            let _ = shell.open_media(path);
        }

        Self {
            shell,
            theme,
            theme_path: config.theme,
            display_mode: DisplayMode::FitToWindow,
            side_panel: SidePanel::default(),
            settings: None,
        }
    }

    fn open_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Open Video File")
            .add_filter("Video Files", VIDEO_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            let _ = self.shell.open_media(path);
        }
    }

    fn open_folder(&mut self) {
        if let Some(dir) = rfd::FileDialog::new()
            .set_title("Open Folder")
            .pick_folder()
        {
            self.shell.open_folder(&dir);
        }
    }

    fn toggle_fullscreen(ctx: &egui::Context) {
        let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
        ctx.send_viewport_cmd(ViewportCommand::Fullscreen(!fullscreen));
    }

    fn handle_menu(&mut self, ctx: &egui::Context, action: MenuAction) {
        tracing::debug!(?action, "menu");
        match action {
            MenuAction::OpenFile => self.open_file(),
            MenuAction::OpenFolder => self.open_folder(),
            MenuAction::Exit => ctx.send_viewport_cmd(ViewportCommand::Close),
            MenuAction::GenerateSubtitles => {
                self.shell.show_planned_feature(PlannedFeature::Subtitles)
            }
            MenuAction::ExtractCode => self.shell.show_planned_feature(PlannedFeature::CodeExtraction),
            MenuAction::Settings => {
                if self.settings.is_none() {
                    self.settings = Some(SettingsPaths::resolve(
                        self.shell.snapshot_dir(),
                        &self.theme_path,
                    ));
                }
            }
            MenuAction::Documentation => self.shell.show_dialog(InfoDialog::documentation()),
            MenuAction::About => self.shell.show_dialog(InfoDialog::about()),
        }
    }

    fn handle_shortcut(&mut self, ctx: &egui::Context, action: ControlAction) {
        if action == ControlAction::ToggleSidePanel {
            self.shell.toggle_side_panel();
            return;
        }
        if !self.shell.transport().is_enabled() {
            return;
        }
        match action {
            ControlAction::PlayPause => self.shell.toggle_play_pause(),
            ControlAction::Stop => self.shell.stop(),
            ControlAction::Seek(delta) => self.shell.seek_relative(delta),
            ControlAction::VolumeUp => self.shell.set_volume(self.shell.volume() + VOLUME_STEP),
            ControlAction::VolumeDown => self.shell.set_volume(self.shell.volume() - VOLUME_STEP),
            ControlAction::Mute => self.shell.toggle_mute(),
            ControlAction::Fullscreen => Self::toggle_fullscreen(ctx),
            ControlAction::Next => self.shell.next(),
            ControlAction::Previous => self.shell.previous(),
            ControlAction::ToggleSidePanel => {}
        }
    }

    /// Side panel and its toggle, layered over the right edge of the video
    fn show_overlay(&mut self, ctx: &egui::Context, video_rect: Rect) {
        let visible = self.shell.side_panel_visible();

        if visible {
            let width = PANEL_WIDTH.min(video_rect.width());
            let panel_rect = Rect::from_min_size(
                Pos2::new(video_rect.right() - width, video_rect.top()),
                Vec2::new(width, video_rect.height()),
            );
            Area::new(Id::new("side_panel"))
                .order(Order::Middle)
                .fixed_pos(panel_rect.min)
                .show(ctx, |ui| {
                    Frame::window(&ctx.style()).show(ui, |ui| {
                        let inner = panel_rect.shrink(8.0).size();
                        ui.set_min_size(inner);
                        ui.set_max_size(inner);
                        self.side_panel.show(ui, &mut self.shell);
                    });
                });
        }

        let toggle_size = Vec2::new(30.0, 60.0);
        Area::new(Id::new("side_panel_toggle"))
            .order(Order::Foreground)
            .fixed_pos(Pos2::new(
                video_rect.right() - toggle_size.x,
                video_rect.center().y - toggle_size.y / 2.0,
            ))
            .show(ctx, |ui| {
                let glyph = if visible { "▶" } else { "◀" };
                if ui
                    .add(egui::Button::new(glyph).min_size(toggle_size))
                    .on_hover_text("Show / hide side panel")
                    .clicked()
                {
                    self.shell.toggle_side_panel();
                }
            });
    }

    fn show_settings(&mut self, ctx: &egui::Context) {
        let Some(paths) = self.settings.take() else {
            return;
        };
        let mut open = true;
        egui::Window::new("Settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Volume");
                        let mut volume = self.shell.volume() * 100.0;
                        if ui
                            .add(egui::Slider::new(&mut volume, 0.0..=100.0).suffix("%"))
                            .changed()
                        {
                            self.shell.set_volume(volume / 100.0);
                        }
                        ui.end_row();

                        ui.label("Display");
                        ui.horizontal(|ui| {
                            ui.radio_value(&mut self.display_mode, DisplayMode::FitToWindow, "Fit to window");
                            ui.radio_value(&mut self.display_mode, DisplayMode::NativeSize, "Native size");
                        });
                        ui.end_row();

                        ui.label("Snapshots");
                        ui.monospace(&paths.snapshot_dir);
                        ui.end_row();

                        ui.label("Theme");
                        ui.monospace(&paths.theme);
                        ui.end_row();
                    });
            });
        if open {
            self.settings = Some(paths);
        }
    }
}

fn display_path(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

impl eframe::App for MediaPlayerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.shell.engine_mut().update();
        self.shell.pump_events();

        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            if let Some(action) = MainMenu::show(ui) {
                self.handle_menu(ctx, action);
            }
        });

        TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            PlayerControls::show(ui, &mut self.shell, &mut self.display_mode);
        });

        let mut open_requested = false;
        let video_rect = CentralPanel::default()
            .frame(Frame::none())
            .show(ctx, |ui| {
                open_requested = VideoSurface::show(
                    ui,
                    self.shell.engine(),
                    &mut self.display_mode,
                    self.theme.video_background,
                );
                ui.max_rect()
            })
            .inner;
        if open_requested {
            self.open_file();
        }

        self.show_overlay(ctx, video_rect);

        self.show_settings(ctx);

        if let Some(dialog) = self.shell.dialog().cloned() {
            if show_info_dialog(ctx, &dialog) {
                self.shell.dismiss_dialog();
            }
        } else {
            for action in read_shortcuts(ctx) {
                self.handle_shortcut(ctx, action);
            }
        }

        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone()));
        if let Some(path) = dropped {
            let _ = self.shell.open_media(path);
        }

        // Engine events can arrive while nothing is playing
        if self.shell.transport().is_enabled() {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

impl Drop for MediaPlayerApp {
    fn drop(&mut self) {
        self.shell.shutdown();
    }
}
