//! Static Chart Renderer
//! Rasterizes choropleths and writes charts to PNG with plotters.
//!
//! Maps use an equirectangular projection cropped to 85°N..60°S. Without
//! country outlines a map degrades to a grid of tiles, one per region,
//! sorted by ISO code.

use super::scale::{palette_color, MISSING_COLOR, OCEAN_COLOR};
use super::spec::{Choropleth, LegendPosition, LineChart};
use crate::data::WorldGeometry;
use egui::Color32;
use image::RgbImage;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing failed: {0}")]
    Draw(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid raster size {0}x{1}")]
    InvalidSize(u32, u32),
}

fn draw_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Draw(e.to_string())
}

const LAT_TOP: f64 = 85.0;
const LAT_BOTTOM: f64 = -60.0;
const LON_SPAN: f64 = 360.0;

/// Prefix of OWID aggregate codes (`OWID_WRL`, `OWID_EU27`), which name no country.
const AGGREGATE_PREFIX: &str = "OWID_";

const TILE_GAP: u32 = 2;
const TILE_ASPECT: f64 = 0.6;

/// How pixels of a map raster relate to regions.
#[derive(Debug, Clone, PartialEq)]
pub enum MapLayout {
    /// Pixels are projected longitude/latitude.
    Geographic,
    /// Row-major tiles, one region code per tile.
    Tiles {
        columns: u32,
        rows: u32,
        codes: Vec<String>,
    },
}

impl MapLayout {
    /// Region code under a point given in raster fractions (`0..1` on each axis).
    pub fn code_at<'a>(
        &'a self,
        fx: f64,
        fy: f64,
        geometry: Option<&'a WorldGeometry>,
    ) -> Option<&'a str> {
        if !(0.0..1.0).contains(&fx) || !(0.0..1.0).contains(&fy) {
            return None;
        }
        match self {
            MapLayout::Geographic => {
                let (lon, lat) = unproject(fx, fy);
                geometry?.shape_at(lon, lat).map(|s| s.code.as_str())
            }
            MapLayout::Tiles {
                columns,
                rows,
                codes,
            } => {
                let col = (fx * *columns as f64) as usize;
                let row = (fy * *rows as f64) as usize;
                codes
                    .get(row * *columns as usize + col)
                    .map(String::as_str)
            }
        }
    }

    /// Tile rectangle in raster fractions `[x0, y0, x1, y1]`, for labelling.
    pub fn tile_rect(&self, index: usize) -> Option<[f32; 4]> {
        let MapLayout::Tiles { columns, rows, codes } = self else {
            return None;
        };
        if index >= codes.len() {
            return None;
        }
        let (c, r) = ((index as u32 % columns) as f32, (index as u32 / columns) as f32);
        let (w, h) = (1.0 / *columns as f32, 1.0 / *rows as f32);
        Some([c * w, r * h, (c + 1.0) * w, (r + 1.0) * h])
    }
}

/// A rendered map and the layout needed to map pointer positions back to regions.
pub struct MapRaster {
    pub image: RgbImage,
    pub layout: MapLayout,
}

/// Generates static chart images.
pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Rasterize a choropleth. Uses country outlines when available.
    pub fn rasterize_choropleth(
        chart: &Choropleth,
        geometry: Option<&WorldGeometry>,
        width: u32,
    ) -> Result<MapRaster, RenderError> {
        match geometry.filter(|g| !g.is_empty()) {
            Some(world) => Self::rasterize_geographic(chart, world, width),
            None => Self::rasterize_tiles(chart, width),
        }
    }

    fn rasterize_geographic(
        chart: &Choropleth,
        world: &WorldGeometry,
        width: u32,
    ) -> Result<MapRaster, RenderError> {
        let height = ((width as f64) * (LAT_TOP - LAT_BOTTOM) / LON_SPAN).round() as u32;
        let mut buffer = blank_buffer(width, height)?;
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&rgb(OCEAN_COLOR)).map_err(draw_err)?;

            for shape in &world.shapes {
                let color = chart
                    .region(&shape.code)
                    .map(|r| chart.color_of(r))
                    .unwrap_or(MISSING_COLOR);
                for polygon in &shape.polygons {
                    let points: Vec<(i32, i32)> = polygon
                        .exterior
                        .iter()
                        .map(|&[lon, lat]| {
                            let (fx, fy) = project(lon, lat);
                            ((fx * width as f64) as i32, (fy * height as f64) as i32)
                        })
                        .collect();
                    root.draw(&Polygon::new(points.clone(), rgb(color).filled()))
                        .map_err(draw_err)?;
                    root.draw(&PathElement::new(points, rgb(OCEAN_COLOR).stroke_width(1)))
                        .map_err(draw_err)?;
                }
            }
            root.present().map_err(draw_err)?;
        }

        Ok(MapRaster {
            image: into_image(buffer, width, height)?,
            layout: MapLayout::Geographic,
        })
    }

    fn rasterize_tiles(chart: &Choropleth, width: u32) -> Result<MapRaster, RenderError> {
        let mut regions: Vec<_> = chart
            .regions
            .iter()
            .filter(|r| !r.code.starts_with(AGGREGATE_PREFIX))
            .collect();
        regions.sort_by(|a, b| a.code.cmp(&b.code));
        regions.dedup_by(|a, b| a.code == b.code);

        let count = regions.len().max(1) as u32;
        let columns = ((count as f64 / TILE_ASPECT).sqrt().ceil() as u32).max(1);
        let rows = count.div_ceil(columns);
        let tile_w = (width / columns).max(TILE_GAP + 1);
        let height = ((tile_w as f64 * TILE_ASPECT).round() as u32).max(TILE_GAP + 1) * rows;

        let mut buffer = blank_buffer(width, height)?;
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&rgb(OCEAN_COLOR)).map_err(draw_err)?;

            let tile_h = height / rows;
            for (i, region) in regions.iter().enumerate() {
                let (c, r) = (i as u32 % columns, i as u32 / columns);
                let x0 = (c * width / columns) as i32;
                let y0 = (r * tile_h) as i32;
                let x1 = ((c + 1) * width / columns) as i32 - TILE_GAP as i32;
                let y1 = y0 + tile_h as i32 - TILE_GAP as i32;
                root.draw(&Rectangle::new(
                    [(x0, y0), (x1, y1)],
                    rgb(chart.color_of(region)).filled(),
                ))
                .map_err(draw_err)?;
            }
            root.present().map_err(draw_err)?;
        }

        Ok(MapRaster {
            image: into_image(buffer, width, height)?,
            layout: MapLayout::Tiles {
                columns,
                rows,
                codes: regions.iter().map(|r| r.code.clone()).collect(),
            },
        })
    }

    /// Write a rendered map to a PNG file.
    pub fn save_map(raster: &MapRaster, path: &Path) -> Result<(), RenderError> {
        raster.image.save(path)?;
        Ok(())
    }

    /// Draw a line chart into a PNG file.
    pub fn save_line_chart(
        chart: &LineChart,
        path: &Path,
        (width, height): (u32, u32),
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let (x_min, x_max) = padded(chart.x_range(), 0.0);
        let (y_min, y_max) = padded(chart.y_range(), 0.05);

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(draw_err)?;

        ctx.configure_mesh()
            .x_desc(chart.x_label.as_str())
            .y_desc(chart.y_label.as_str())
            .draw()
            .map_err(draw_err)?;

        for (i, series) in chart.series.iter().enumerate() {
            let color = rgb(palette_color(i));
            ctx.draw_series(LineSeries::new(
                series.points.iter().map(|p| (p[0], p[1])),
                color.stroke_width(2),
            ))
            .map_err(draw_err)?
            .label(series.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        if !chart.series.is_empty() {
            let position = match chart.legend {
                LegendPosition::TopLeft => SeriesLabelPosition::UpperLeft,
                LegendPosition::TopRight => SeriesLabelPosition::UpperRight,
            };
            ctx.configure_series_labels()
                .position(position)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(draw_err)?;
        }

        root.present().map_err(draw_err)?;
        Ok(())
    }
}

/// `(lon, lat)` to raster fractions.
fn project(lon: f64, lat: f64) -> (f64, f64) {
    let fx = (lon + 180.0) / LON_SPAN;
    let fy = (LAT_TOP - lat) / (LAT_TOP - LAT_BOTTOM);
    (fx, fy)
}

/// Raster fractions to `(lon, lat)`.
fn unproject(fx: f64, fy: f64) -> (f64, f64) {
    (fx * LON_SPAN - 180.0, LAT_TOP - fy * (LAT_TOP - LAT_BOTTOM))
}

fn padded(range: Option<(f64, f64)>, fraction: f64) -> (f64, f64) {
    match range {
        None => (0.0, 1.0),
        Some((lo, hi)) if hi - lo <= f64::EPSILON => (lo - 0.5, hi + 0.5),
        Some((lo, hi)) => {
            let pad = (hi - lo) * fraction;
            (lo - pad, hi + pad)
        }
    }
}

fn rgb(color: Color32) -> RGBColor {
    RGBColor(color.r(), color.g(), color.b())
}

fn blank_buffer(width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|px| px.checked_mul(3))
        .filter(|&len| len > 0)
        .ok_or(RenderError::InvalidSize(width, height))?;
    Ok(vec![255u8; len])
}

fn into_image(buffer: Vec<u8>, width: u32, height: u32) -> Result<RgbImage, RenderError> {
    RgbImage::from_raw(width, height, buffer).ok_or(RenderError::InvalidSize(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::scale::ColorScale;
    use crate::charts::spec::{Region, RegionValue};

    const SQUARES: &str = r#"{"features": [
        {"id": "AAA", "geometry": {"type": "Polygon", "coordinates": [[[-10, -10], [10, -10], [10, 10], [-10, 10], [-10, -10]]]}},
        {"id": "BBB", "geometry": {"type": "Polygon", "coordinates": [[[100, 30], [120, 30], [120, 50], [100, 50], [100, 30]]]}}
    ]}"#;

    fn chart() -> Choropleth {
        Choropleth {
            title: "test".into(),
            value_label: "value".into(),
            regions: vec![
                Region {
                    code: "BBB".into(),
                    name: "Bee".into(),
                    value: RegionValue::Number(25.0),
                },
                Region {
                    code: "AAA".into(),
                    name: "Ay".into(),
                    value: RegionValue::Number(0.0),
                },
                Region {
                    code: "CCC".into(),
                    name: "Sea".into(),
                    value: RegionValue::Missing,
                },
            ],
            scale: ColorScale::reds(0.0, 25.0),
        }
    }

    fn pixel_at(raster: &MapRaster, lon: f64, lat: f64) -> [u8; 3] {
        let (fx, fy) = project(lon, lat);
        let x = (fx * raster.image.width() as f64) as u32;
        let y = (fy * raster.image.height() as f64) as u32;
        raster.image.get_pixel(x, y).0
    }

    #[test]
    fn projection_round_trips_a_point() {
        let (fx, fy) = project(13.4, 52.5);
        let (lon, lat) = unproject(fx, fy);
        assert!((lon - 13.4).abs() < 1e-9);
        assert!((lat - 52.5).abs() < 1e-9);
    }

    #[test]
    fn geographic_raster_fills_regions_with_scale_colors() {
        let world = WorldGeometry::from_geojson_str(SQUARES, "ISO_A3").unwrap();
        let chart = chart();
        let raster = StaticChartRenderer::rasterize_choropleth(&chart, Some(&world), 720).unwrap();

        assert_eq!(raster.image.width(), 720);
        assert_eq!(raster.image.height(), 290);
        let dark = chart.color_of(chart.region("BBB").unwrap());
        assert_eq!(pixel_at(&raster, 110.0, 40.0), [dark.r(), dark.g(), dark.b()]);
        assert_eq!(
            pixel_at(&raster, -60.0, -30.0),
            [OCEAN_COLOR.r(), OCEAN_COLOR.g(), OCEAN_COLOR.b()]
        );
    }

    #[test]
    fn geographic_hover_finds_region() {
        let world = WorldGeometry::from_geojson_str(SQUARES, "ISO_A3").unwrap();
        let layout = MapLayout::Geographic;

        let (fx, fy) = project(0.0, 0.0);
        assert_eq!(layout.code_at(fx, fy, Some(&world)), Some("AAA"));
        let (fx, fy) = project(-60.0, -30.0);
        assert_eq!(layout.code_at(fx, fy, Some(&world)), None);
        assert_eq!(layout.code_at(1.5, 0.5, Some(&world)), None);
    }

    #[test]
    fn tiles_are_sorted_by_code() {
        let raster = StaticChartRenderer::rasterize_choropleth(&chart(), None, 300).unwrap();

        let MapLayout::Tiles { columns, rows, codes } = &raster.layout else {
            panic!("expected tile layout");
        };
        assert_eq!(codes, &vec!["AAA", "BBB", "CCC"]);
        assert!(columns * rows >= 3);
        assert_eq!(raster.layout.code_at(0.01, 0.01, None), Some("AAA"));
        assert!(raster.layout.tile_rect(2).is_some());
        assert!(raster.layout.tile_rect(3).is_none());
    }

    #[test]
    fn aggregate_codes_get_no_tile() {
        let mut chart = chart();
        chart.regions.push(Region {
            code: "OWID_WRL".into(),
            name: "World".into(),
            value: RegionValue::Number(4.5),
        });

        let raster = StaticChartRenderer::rasterize_choropleth(&chart, None, 300).unwrap();
        let MapLayout::Tiles { codes, .. } = &raster.layout else {
            panic!("expected tile layout");
        };
        assert_eq!(codes, &vec!["AAA", "BBB", "CCC"]);
    }

    #[test]
    fn oversized_buffer_is_rejected() {
        assert!(matches!(
            blank_buffer(u32::MAX, u32::MAX),
            Err(RenderError::InvalidSize(u32::MAX, u32::MAX))
        ));
        assert!(matches!(blank_buffer(0, 10), Err(RenderError::InvalidSize(0, 10))));
        assert_eq!(blank_buffer(4, 2).unwrap().len(), 24);
    }

    #[test]
    fn zero_width_is_rejected() {
        let err = StaticChartRenderer::rasterize_choropleth(&chart(), None, 0);
        assert!(err.is_err());
    }

    #[test]
    fn padded_range_widens_degenerate_spans() {
        assert_eq!(padded(None, 0.1), (0.0, 1.0));
        assert_eq!(padded(Some((2.0, 2.0)), 0.1), (1.5, 2.5));
        assert_eq!(padded(Some((0.0, 10.0)), 0.1), (-1.0, 11.0));
    }
}
