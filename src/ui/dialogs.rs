use egui::{Align2, Area, Color32, Context, Id, Key, Order, RichText, Sense, Window};

use crate::dialog::{DialogKind, InfoDialog};

/// Draw `dialog` as a modal window. Returns true once the user dismissed it.
pub fn show_info_dialog(ctx: &Context, dialog: &InfoDialog) -> bool {
    // Backdrop swallows clicks aimed at the window underneath
    let screen = ctx.screen_rect();
    Area::new(Id::new("dialog_backdrop"))
        .order(Order::Foreground)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            ui.painter()
                .rect_filled(screen, 0.0, Color32::from_black_alpha(120));
            ui.allocate_response(screen.size(), Sense::click());
        });

    let mut dismissed = ctx.input(|i| i.key_pressed(Key::Escape) || i.key_pressed(Key::Enter));

    Window::new(dialog.title.as_str())
        .id(Id::new("info_dialog"))
        .order(Order::Tooltip)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_max_width(420.0);
            let header = RichText::new(&dialog.header).strong().size(15.0);
            match dialog.kind {
                DialogKind::Info => ui.label(header),
                DialogKind::Error => ui.label(header.color(Color32::from_rgb(230, 90, 80))),
            };
            ui.add_space(8.0);
            ui.label(&dialog.body);
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });

    dismissed
}
