mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::SalesDashboardApp;
use eframe::egui;
use sales_dashboard::data::loader::DEFAULT_SOURCE;

fn main() -> eframe::Result {
    env_logger::init();

    let source = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE));
    log::info!("Starting with data source {}", source.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Retail Sales Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(SalesDashboardApp::open(&source)))),
    )
}
