//! Dashboard Main Application
//! Owns the dataset cache and the page, and shows an error page when loading fails.

use crate::config::DashboardConfig;
use crate::data::DatasetCache;
use crate::gui::{Dashboard, PageAction, PageView};
use crate::page::{self, Page};
use egui::{Color32, RichText, TopBottomPanel};

enum AppState {
    Ready { page: Page, dashboard: Box<Dashboard> },
    Failed(String),
}

/// Main application window.
pub struct DashboardApp {
    // Lives for the whole session; entries are never invalidated
    cache: DatasetCache,
    state: AppState,
    status: String,
}

impl DashboardApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        let mut cache = DatasetCache::new(config.data.clone());

        let state = match Dashboard::load(&cc.egui_ctx, &config, &mut cache) {
            Ok(dashboard) => {
                let page = page::compose();
                log::info!(
                    "Dashboard ready: {} charts, {} datasets cached",
                    page.chart_slots().len(),
                    cache.len()
                );
                AppState::Ready {
                    page,
                    dashboard: Box::new(dashboard),
                }
            }
            Err(e) => {
                log::error!("Failed to build dashboard: {}", e);
                AppState::Failed(e.to_string())
            }
        };

        Self {
            cache,
            state,
            status: "Ready".to_string(),
        }
    }

    /// Export charts as PNG into a user-chosen folder.
    fn handle_export(&mut self) {
        let AppState::Ready { dashboard, .. } = &self.state else {
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        match dashboard.export(&dir) {
            Ok(files) => {
                log::info!("Exported {} charts to {}", files.len(), dir.display());
                self.status = format!("Exported {} charts to {}", files.len(), dir.display());
                if let Err(e) = open::that(&dir) {
                    log::warn!("Could not open {}: {}", dir.display(), e);
                }
            }
            Err(e) => {
                log::error!("Export failed: {:#}", e);
                self.status = format!("Error: {:#}", e);
            }
        }
    }

    fn show_error_page(ui: &mut egui::Ui, message: &str) {
        ui.add_space(20.0);
        ui.label(
            RichText::new("⚠ The dashboard could not be rendered")
                .size(22.0)
                .strong()
                .color(Color32::from_rgb(220, 53, 69)),
        );
        ui.add_space(10.0);
        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(5.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(message).monospace());
            });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut export_clicked = false;

        TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let ready = matches!(self.state, AppState::Ready { .. });
                ui.add_enabled_ui(ready, |ui| {
                    if ui.button("💾 Export charts…").clicked() {
                        export_clicked = true;
                    }
                });

                let status_color = if self.status.starts_with("Error") {
                    Color32::from_rgb(220, 53, 69)
                } else {
                    Color32::GRAY
                };
                ui.label(RichText::new(&self.status).size(11.0).color(status_color));
            });
        });

        let mut failure = None;
        egui::CentralPanel::default().show(ctx, |ui| match &mut self.state {
            AppState::Ready { page, dashboard } => {
                if PageView::show(ui, page, dashboard) == PageAction::SelectionChanged {
                    if let Err(e) = dashboard.refresh_co2_trend(&mut self.cache) {
                        log::error!("Failed to rebuild CO2 trend: {}", e);
                        failure = Some(e.to_string());
                    }
                    ctx.request_repaint();
                }
            }
            AppState::Failed(message) => Self::show_error_page(ui, message),
        });

        if let Some(message) = failure {
            self.state = AppState::Failed(message);
        }
        if export_clicked {
            self.handle_export();
        }
    }
}
