mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::CovidDashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let mut state = match DashboardConfig::discover() {
        Ok(config) => AppState::new(config),
        Err(e) => {
            log::error!("Falling back to default config: {e:#}");
            let mut state = AppState::new(DashboardConfig::default());
            state.config_error = Some(format!("Config error: {e:#}"));
            state
        }
    };

    // Optional dataset to open at startup.
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        state.load(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1300.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "COVID Demographics – Cross-Filter Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(CovidDashboardApp::new(state)))),
    )
}
