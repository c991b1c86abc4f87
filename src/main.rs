mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::DashboardApp;
use config::{DashboardConfig, CONFIG_ENV};
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config =
        DashboardConfig::from_args(std::env::args().nth(1), std::env::var(CONFIG_ENV).ok())?;
    let title = config.title.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
