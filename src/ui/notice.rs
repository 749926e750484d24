use eframe::egui::{self, Align2, Color32, RichText};

use crate::state::{AppState, Severity};

/// Show the oldest pending notice as a modal window.
pub fn notice_window(ctx: &egui::Context, state: &mut AppState) {
    let Some(notice) = state.notices.first().cloned() else {
        return;
    };
    let (title, color) = match notice.severity {
        Severity::Info => ("Info", Color32::LIGHT_BLUE),
        Severity::Warning => ("Warning", Color32::GOLD),
        Severity::Error => ("Error", Color32::RED),
    };

    let mut dismissed = false;
    egui::Window::new(RichText::new(title).color(color))
        .id(egui::Id::new("notice_window"))
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(&notice.message);
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });

    if dismissed || ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
        state.dismiss_notice();
    }
}
