use egui::Ui;

/// Menu entries the window reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    OpenFile,
    OpenFolder,
    Exit,
    GenerateSubtitles,
    ExtractCode,
    Settings,
    Documentation,
    About,
}

pub struct MainMenu;

impl MainMenu {
    /// File, Tools and Help menus. Returns the item clicked this frame.
    pub fn show(ui: &mut Ui) -> Option<MenuAction> {
        let mut action = None;
        let mut item = |ui: &mut Ui, label: &str, clicked: MenuAction| {
            if ui.button(label).clicked() {
                ui.close_menu();
                action = Some(clicked);
            }
        };

        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                item(ui, "Open Video File...", MenuAction::OpenFile);
                item(ui, "Open Folder...", MenuAction::OpenFolder);
                ui.separator();
                item(ui, "Exit", MenuAction::Exit);
            });
            ui.menu_button("Tools", |ui| {
                item(ui, "Generate Subtitles (ML)", MenuAction::GenerateSubtitles);
                item(ui, "Extract Code from Video", MenuAction::ExtractCode);
                ui.separator();
                item(ui, "Settings", MenuAction::Settings);
            });
            ui.menu_button("Help", |ui| {
                item(ui, "Documentation", MenuAction::Documentation);
                item(ui, "About", MenuAction::About);
            });
        });

        action
    }
}
