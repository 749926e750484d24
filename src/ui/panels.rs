use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::filter::SelectionKey;
use crate::data::model::DatasetKind;
use crate::state::{AppState, SceneKind, View};
use crate::ui::export;

// ---------------------------------------------------------------------------
// Left side panel – loaders, selectors and model buttons
// ---------------------------------------------------------------------------

/// Render the left menu panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading("MENU");
    });
    ui.separator();

    for kind in DatasetKind::ALL {
        let button = egui::Button::new(format!("Load {kind} Data"));
        if ui.add_sized([ui.available_width(), 24.0], button).clicked() {
            open_file_dialog(state, kind);
        }
    }
    ui.add_space(8.0);

    ui.strong("Selection");
    for key in SelectionKey::ALL {
        selection_combo(ui, state, key);
    }
    ui.add_space(8.0);

    if ui
        .add_sized([ui.available_width(), 24.0], egui::Button::new("Make 2D Model"))
        .clicked()
    {
        state.build(SceneKind::Section);
    }
    if ui
        .add_sized([ui.available_width(), 24.0], egui::Button::new("Make 3D Model"))
        .clicked()
    {
        state.build(SceneKind::Model);
    }

    ui.separator();
    ui.strong("Datasets");
    for kind in DatasetKind::ALL {
        let text = match state.table(kind) {
            Some(t) => format!("{kind}: {} rows", t.len()),
            None => format!("{kind}: not loaded"),
        };
        ui.label(text);
    }
}

fn selection_combo(ui: &mut Ui, state: &mut AppState, key: SelectionKey) {
    let options = state.menus.options(key).to_vec();
    let current = state.selection.get(key).map(str::to_string);
    let placeholder = format!("Select {}", capitalize(key.name()));

    let mut picked: Option<Option<String>> = None;
    egui::ComboBox::from_id_salt(key.name())
        .width(ui.available_width() - 8.0)
        .selected_text(current.clone().unwrap_or(placeholder.clone()))
        .show_ui(ui, |ui: &mut Ui| {
            if ui
                .selectable_label(current.is_none(), RichText::new(&placeholder).italics())
                .clicked()
            {
                picked = Some(None);
            }
            for option in &options {
                if ui
                    .selectable_label(current.as_deref() == Some(option), option)
                    .clicked()
                {
                    picked = Some(Some(option.clone()));
                }
            }
        });

    if let Some(value) = picked {
        state.select(key, value);
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            for kind in DatasetKind::ALL {
                if ui.button(format!("Load {kind}…")).clicked() {
                    open_file_dialog(state, kind);
                    ui.close_menu();
                }
            }
            ui.separator();
            if ui.button("Export view…").clicked() {
                export::choose_export_path(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.view, View::Tables, "Tables");
        ui.selectable_value(&mut state.view, View::Section, "2D Section");
        ui.selectable_value(&mut state.view, View::Model, "3D Model");

        ui.separator();

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::GRAY));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Pick a file for `kind` and load it. A cancelled dialog does nothing.
pub fn open_file_dialog(state: &mut AppState, kind: DatasetKind) {
    let file = rfd::FileDialog::new()
        .set_title(format!("Open {kind} data"))
        .add_filter(
            "Supported files",
            &["csv", "xlsx", "xls", "ods", "json", "parquet", "pq"],
        )
        .add_filter("CSV", &["csv"])
        .add_filter("Spreadsheet", &["xlsx", "xls", "ods"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    match file {
        Some(path) => state.load(kind, &path),
        None => log::debug!("{kind} load cancelled"),
    }
}
