use eframe::egui::{self, Ui};

use crate::config::Config;
use crate::state::{AppState, BuiltScene, View};
use crate::ui::{export, notice, panels, plot, tables, view3d};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct HydroscopeApp {
    pub state: AppState,
}

impl HydroscopeApp {
    /// Build the app and load any datasets the config names.
    pub fn new(config: Config) -> Self {
        let mut state = AppState::new(config);
        state.load_configured();
        Self { state }
    }
}

impl eframe::App for HydroscopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: loaders and selectors ----
        egui::SidePanel::left("menu_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tables or model ----
        egui::CentralPanel::default().show(ctx, |ui| {
            central_view(ui, &mut self.state);
        });

        notice::notice_window(ctx, &mut self.state);
        export::handle_export(ctx, &mut self.state);
    }
}

fn central_view(ui: &mut Ui, state: &mut AppState) {
    if state.view == View::Tables {
        tables::tables_view(ui, state);
        return;
    }
    match (state.view, &state.scene) {
        (View::Section, Some(BuiltScene::Section(scene))) => plot::section_plot(ui, scene),
        (View::Model, Some(BuiltScene::Model(scene))) => {
            view3d::model_view(ui, scene, &mut state.camera)
        }
        (View::Model, _) => placeholder(ui, "Choose all four selections, then Make 3D Model."),
        _ => placeholder(ui, "Choose all four selections, then Make 2D Model."),
    }
}

fn placeholder(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(text);
    });
}
