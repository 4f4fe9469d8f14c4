//! Global Warming & CO2 Emission Dashboard
//!
//! A single-page dashboard of temperature anomalies, CO2 emissions per capita
//! and national net-zero targets.

mod charts;
mod config;
mod data;
mod gui;
mod page;

use config::DashboardConfig;
use eframe::egui;
use gui::DashboardApp;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::load_default();
    let window = &config.window;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([window.width, window.height])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Global Warming and CO2 Emission"),
        ..Default::default()
    };

    eframe::run_native(
        "Global Warming Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
}
