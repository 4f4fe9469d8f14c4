//! Page View Widget
//! Scrollable wide layout that renders the composed page section by section.

use crate::charts::ChartPlotter;
use crate::gui::Dashboard;
use crate::page::{column_widths, Body, ChartSlot, Page, Pane, Paragraph, Span};
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 24.0;
const LINE_CHART_HEIGHT: f32 = 380.0;

/// Actions triggered while drawing the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    None,
    SelectionChanged,
}

/// Renders a [`Page`] with the dashboard's charts.
pub struct PageView;

impl PageView {
    pub fn show(ui: &mut egui::Ui, page: &Page, dashboard: &mut Dashboard) -> PageAction {
        let mut action = PageAction::None;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(8.0);
                ui.label(RichText::new(&page.title).size(30.0).strong());
                ui.add_space(6.0);
                Self::draw_paragraphs(ui, &page.intro);

                for section in &page.sections {
                    ui.add_space(SECTION_SPACING);
                    ui.label(RichText::new(&section.heading).size(22.0).strong());
                    ui.add_space(6.0);
                    Self::draw_paragraphs(ui, &section.text);

                    match &section.body {
                        Body::Empty => {}
                        Body::Full(pane) => {
                            if Self::draw_pane(ui, pane, dashboard) == PageAction::SelectionChanged {
                                action = PageAction::SelectionChanged;
                            }
                        }
                        Body::Columns(left, right) => {
                            let [left_w, gap, right_w] = column_widths(ui.available_width());
                            ui.horizontal_top(|ui| {
                                // Item spacing eats into the fixed column widths
                                let spacing = ui.spacing().item_spacing.x;
                                for (i, pane) in [left, right].into_iter().enumerate() {
                                    let width = if i == 0 { left_w } else { right_w };
                                    ui.vertical(|ui| {
                                        ui.set_width(width - spacing);
                                        if let Some(pane) = pane {
                                            if Self::draw_pane(ui, pane, dashboard)
                                                == PageAction::SelectionChanged
                                            {
                                                action = PageAction::SelectionChanged;
                                            }
                                        }
                                    });
                                    if i == 0 {
                                        ui.add_space(gap - spacing);
                                    }
                                }
                            });
                        }
                    }
                }
                ui.add_space(SECTION_SPACING);
            });

        action
    }

    fn draw_pane(ui: &mut egui::Ui, pane: &Pane, dashboard: &mut Dashboard) -> PageAction {
        match pane {
            Pane::Text(paragraphs) => Self::draw_paragraphs(ui, paragraphs),
            Pane::Image { caption } => {
                ui.add(
                    egui::Image::new(&dashboard.anomaly_image)
                        .max_width(ui.available_width())
                        .shrink_to_fit(),
                );
                ui.label(RichText::new(caption).size(11.0).color(Color32::GRAY));
            }
            Pane::Chart(slot) => return Self::draw_chart(ui, *slot, dashboard),
        }
        PageAction::None
    }

    fn draw_chart(ui: &mut egui::Ui, slot: ChartSlot, dashboard: &mut Dashboard) -> PageAction {
        match slot {
            ChartSlot::TemperatureTrend => ChartPlotter::draw_line_chart(
                ui,
                "temperature_trend",
                &dashboard.temperature_trend,
                LINE_CHART_HEIGHT,
            ),
            ChartSlot::Co2Map => {
                ChartPlotter::draw_choropleth(ui, &dashboard.co2_map, dashboard.geometry.as_ref())
            }
            ChartSlot::Co2Trend => {
                let changed = dashboard.selection.show(ui);
                ui.add_space(8.0);
                ChartPlotter::draw_line_chart(ui, "co2_trend", &dashboard.co2_trend, LINE_CHART_HEIGHT);
                if changed {
                    return PageAction::SelectionChanged;
                }
            }
            ChartSlot::NetZeroMap => ChartPlotter::draw_choropleth(
                ui,
                &dashboard.net_zero_map,
                dashboard.geometry.as_ref(),
            ),
        }
        PageAction::None
    }

    fn draw_paragraphs(ui: &mut egui::Ui, paragraphs: &[Paragraph]) {
        for paragraph in paragraphs {
            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing.x = 0.0;
                for span in paragraph {
                    match span {
                        Span::Text(text) => {
                            ui.label(RichText::new(text).size(14.0));
                        }
                        Span::Link { label, url } => {
                            ui.hyperlink_to(RichText::new(label).size(14.0), url);
                        }
                    }
                }
            });
            ui.add_space(6.0);
        }
    }
}
