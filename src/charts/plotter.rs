//! Chart Plotter Module
//! Draws chart specifications interactively with egui / egui_plot.

use super::renderer::{MapLayout, MapRaster};
use super::scale::{palette_color, ColorScale};
use super::spec::{Choropleth, LegendPosition, LineChart};
use crate::data::WorldGeometry;
use egui::{Align2, Color32, FontId, Rect, RichText, Sense, TextureHandle, TextureOptions};
use egui_plot::{Corner, Legend, Line, Plot, PlotPoints};

const LEGEND_STEPS: usize = 48;
const LEGEND_BAR_WIDTH: f32 = 260.0;
const LEGEND_BAR_HEIGHT: f32 = 12.0;

/// A choropleth with its rasterized map uploaded as a texture.
pub struct MapView {
    pub chart: Choropleth,
    pub raster: MapRaster,
    texture: TextureHandle,
}

impl MapView {
    pub fn new(ctx: &egui::Context, name: &str, chart: Choropleth, raster: MapRaster) -> Self {
        let size = [raster.image.width() as usize, raster.image.height() as usize];
        let image = egui::ColorImage::from_rgb(size, raster.image.as_raw());
        let texture = ctx.load_texture(name, image, TextureOptions::LINEAR);
        Self {
            chart,
            raster,
            texture,
        }
    }

    fn aspect(&self) -> f32 {
        let [w, h] = self.texture.size();
        if w == 0 {
            1.0
        } else {
            h as f32 / w as f32
        }
    }
}

/// Draws dashboard charts using egui_plot and textures.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Title line with an optional smaller subtitle.
    pub fn draw_title(ui: &mut egui::Ui, title: &str, subtitle: Option<&str>) {
        if !title.is_empty() {
            ui.label(RichText::new(title).size(16.0).strong());
        }
        if let Some(subtitle) = subtitle {
            ui.label(RichText::new(subtitle).size(11.0).color(Color32::GRAY));
        }
        ui.add_space(4.0);
    }

    /// Multi-series line chart. An empty chart draws empty axes.
    pub fn draw_line_chart(ui: &mut egui::Ui, id: &str, chart: &LineChart, height: f32) {
        Self::draw_title(ui, &chart.title, chart.subtitle.as_deref());

        let corner = match chart.legend {
            LegendPosition::TopLeft => Corner::LeftTop,
            LegendPosition::TopRight => Corner::RightTop,
        };

        Plot::new(id)
            .height(height)
            .legend(Legend::default().position(corner))
            .x_axis_label(chart.x_label.clone())
            .y_axis_label(chart.y_label.clone())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (i, series) in chart.series.iter().enumerate() {
                    plot_ui.line(
                        Line::new(PlotPoints::from(series.points.clone()))
                            .color(palette_color(i))
                            .width(2.0)
                            .name(&series.name),
                    );
                }
            });
    }

    /// World map with hover tooltips and a color legend underneath.
    pub fn draw_choropleth(ui: &mut egui::Ui, map: &MapView, geometry: Option<&WorldGeometry>) {
        Self::draw_title(ui, &map.chart.title, None);

        let width = ui.available_width();
        let size = egui::vec2(width, width * map.aspect());
        let response = ui.add(
            egui::Image::new(&map.texture)
                .fit_to_exact_size(size)
                .sense(Sense::hover()),
        );
        let rect = response.rect;

        if let MapLayout::Tiles { codes, .. } = &map.raster.layout {
            Self::draw_tile_labels(ui, rect, map, codes);
        }

        let hover_text = response.hover_pos().and_then(|pos| {
            let fx = ((pos.x - rect.min.x) / rect.width()) as f64;
            let fy = ((pos.y - rect.min.y) / rect.height()) as f64;
            let code = map.raster.layout.code_at(fx, fy, geometry)?;
            let region = map.chart.region(code)?;
            Some(format!(
                "{}\n{}: {}",
                region.name, map.chart.value_label, region.value
            ))
        });
        if let Some(text) = hover_text {
            response.on_hover_text_at_pointer(text);
        }

        ui.add_space(6.0);
        Self::draw_scale_legend(ui, &map.chart.scale, &map.chart.value_label);
    }

    fn draw_tile_labels(ui: &egui::Ui, rect: Rect, map: &MapView, codes: &[String]) {
        let painter = ui.painter_at(rect);
        for (i, code) in codes.iter().enumerate() {
            let Some([x0, y0, x1, y1]) = map.raster.layout.tile_rect(i) else {
                continue;
            };
            let tile = Rect::from_min_max(
                rect.lerp_inside(egui::vec2(x0, y0)),
                rect.lerp_inside(egui::vec2(x1, y1)),
            );
            let fill = map
                .chart
                .region(code)
                .map(|r| map.chart.color_of(r))
                .unwrap_or(Color32::GRAY);
            painter.text(
                tile.center(),
                Align2::CENTER_CENTER,
                code,
                FontId::proportional((tile.height() * 0.35).clamp(7.0, 13.0)),
                Self::contrast_text(fill),
            );
        }
    }

    /// Gradient bar for continuous scales, swatches for categories.
    pub fn draw_scale_legend(ui: &mut egui::Ui, scale: &ColorScale, label: &str) {
        match scale {
            ColorScale::Continuous { min, max, stops } => {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(label).size(12.0));
                    ui.label(RichText::new(format!("{}", min)).size(11.0));

                    let (rect, _) = ui.allocate_exact_size(
                        egui::vec2(LEGEND_BAR_WIDTH, LEGEND_BAR_HEIGHT),
                        Sense::hover(),
                    );
                    let step = rect.width() / LEGEND_STEPS as f32;
                    for i in 0..LEGEND_STEPS {
                        let t = i as f64 / (LEGEND_STEPS - 1) as f64;
                        let cell = Rect::from_min_size(
                            egui::pos2(rect.min.x + i as f32 * step, rect.min.y),
                            egui::vec2(step + 0.5, rect.height()),
                        );
                        ui.painter()
                            .rect_filled(cell, 0.0, super::scale::interpolate(stops, t));
                    }

                    ui.label(RichText::new(format!("{}", max)).size(11.0));
                });
            }
            ColorScale::Categorical { categories } => {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(label).size(12.0));
                    ui.add_space(8.0);
                    for (name, color) in categories {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(14.0, 14.0), Sense::hover());
                        ui.painter().rect_filled(rect, 3.0, *color);
                        ui.label(RichText::new(name).size(12.0));
                        ui.add_space(10.0);
                    }
                });
            }
        }
    }

    /// Black or white, whichever reads better on `fill`.
    fn contrast_text(fill: Color32) -> Color32 {
        let luma = 0.299 * fill.r() as f32 + 0.587 * fill.g() as f32 + 0.114 * fill.b() as f32;
        if luma > 140.0 {
            Color32::BLACK
        } else {
            Color32::WHITE
        }
    }
}
