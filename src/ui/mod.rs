pub mod controls;
pub mod dialogs;
pub mod menu;
pub mod shortcuts;
pub mod side_panel;
pub mod video;
