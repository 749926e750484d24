mod app;
mod color;
mod config;
mod data;
mod error;
mod scene;
mod state;
mod ui;

use app::HydroscopeApp;
use config::Config;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = Config::load_or_default();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Hydroscope – Hydrogeological Survey Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(HydroscopeApp::new(config)))),
    )
}
