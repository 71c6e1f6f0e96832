mod app;
mod color;
mod config;
mod data;
mod error;
mod insight;
mod particles;
mod state;
mod ui;

use app::{INITIAL_SIZE, NeuralCanvasApp};
use config::Settings;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = Settings::from_env();
    log::debug!("Settings: {settings:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(INITIAL_SIZE)
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "NeuralCanvas – AI Data Explorer",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(NeuralCanvasApp::new(settings)))
        }),
    )
}
