//! Dashboard Content
//! Loads the datasets once and holds every chart the page shows.

use crate::charts::{
    ChartError, ChartFactory, LineChart, MapView, RenderError, StaticChartRenderer,
};
use crate::config::DashboardConfig;
use crate::data::{DataProcessor, Dataset, DatasetCache, GeometryError, LoaderError, WorldGeometry};
use crate::gui::CountrySelection;
use anyhow::Context;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

const EXPORT_SIZE: (u32, u32) = (1400, 800);

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Chart(#[from] ChartError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to load image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Everything the page renders.
pub struct Dashboard {
    pub selection: CountrySelection,
    pub temperature_trend: LineChart,
    pub co2_trend: LineChart,
    pub co2_map: MapView,
    pub net_zero_map: MapView,
    pub geometry: Option<WorldGeometry>,
    pub anomaly_image: egui::TextureHandle,
}

impl Dashboard {
    /// Read all inputs and build every chart. Any failure aborts the page.
    pub fn load(
        ctx: &egui::Context,
        config: &DashboardConfig,
        cache: &mut DatasetCache,
    ) -> Result<Self, DashboardError> {
        let co2 = cache.dataset(Dataset::Co2)?;
        let climate = cache.dataset(Dataset::Climate)?;
        log::debug!(
            "Climate dataset loaded ({} rows) but not charted",
            climate.height()
        );
        let net_zero = cache.dataset(Dataset::NetZero)?;
        let temperature = cache.dataset(Dataset::Temperature)?;

        let geometry = Self::load_geometry(config)?;
        let raster_width = config.map.raster_width;

        let temperature_trend = ChartFactory::temperature_trend(&temperature)?;

        let co2_chart = ChartFactory::co2_map(&co2, config.map.co2_year, config.map.co2_color_range)?;
        let co2_raster =
            StaticChartRenderer::rasterize_choropleth(&co2_chart, geometry.as_ref(), raster_width)?;
        let co2_map = MapView::new(ctx, "co2_map", co2_chart, co2_raster);

        let net_zero_chart = ChartFactory::net_zero_map(&net_zero)?;
        let net_zero_raster = StaticChartRenderer::rasterize_choropleth(
            &net_zero_chart,
            geometry.as_ref(),
            raster_width,
        )?;
        let net_zero_map = MapView::new(ctx, "net_zero_map", net_zero_chart, net_zero_raster);

        let countries = DataProcessor::unique_in_order(&co2, "country")?;
        let selection = CountrySelection::new(countries, &config.selection.default_countries);
        let co2_trend = ChartFactory::co2_trend(&co2, selection.selected())?;

        let anomaly_image = Self::load_image(ctx, &config.data.image_path())?;

        Ok(Self {
            selection,
            temperature_trend,
            co2_trend,
            co2_map,
            net_zero_map,
            geometry,
            anomaly_image,
        })
    }

    /// Rebuild the trend chart from the current selection. Nothing else changes.
    ///
    /// The CO2 frame comes back out of `cache`, so no file is read again.
    pub fn refresh_co2_trend(&mut self, cache: &mut DatasetCache) -> Result<(), DashboardError> {
        let co2 = cache.dataset(Dataset::Co2)?;
        self.co2_trend = ChartFactory::co2_trend(&co2, self.selection.selected())?;
        Ok(())
    }

    /// Write all four charts as PNG files into `dir`.
    pub fn export(&self, dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let temperature = dir.join("temperature_trend.png");
        StaticChartRenderer::save_line_chart(&self.temperature_trend, &temperature, EXPORT_SIZE)
            .with_context(|| format!("writing {}", temperature.display()))?;

        let co2_map = dir.join("co2_map.png");
        StaticChartRenderer::save_map(&self.co2_map.raster, &co2_map)
            .with_context(|| format!("writing {}", co2_map.display()))?;

        let co2_trend = dir.join("co2_trend.png");
        StaticChartRenderer::save_line_chart(&self.co2_trend, &co2_trend, EXPORT_SIZE)
            .with_context(|| format!("writing {}", co2_trend.display()))?;

        let net_zero = dir.join("net_zero_map.png");
        StaticChartRenderer::save_map(&self.net_zero_map.raster, &net_zero)
            .with_context(|| format!("writing {}", net_zero.display()))?;

        Ok(vec![temperature, co2_map, co2_trend, net_zero])
    }

    fn load_geometry(config: &DashboardConfig) -> Result<Option<WorldGeometry>, GeometryError> {
        let Some(path) = config.geometry_path() else {
            return Ok(None);
        };
        if !path.is_file() {
            log::warn!(
                "Map geometry {} not found, drawing maps as tile grids",
                path.display()
            );
            return Ok(None);
        }
        WorldGeometry::load(&path, &config.map.code_property).map(Some)
    }

    fn load_image(ctx: &egui::Context, path: &Path) -> Result<egui::TextureHandle, DashboardError> {
        let image = image::open(path)
            .map_err(|source| DashboardError::Image {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let size = [image.width() as usize, image.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
        Ok(ctx.load_texture("anomaly_map", color_image, egui::TextureOptions::LINEAR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataConfig;
    use std::fs;
    use std::sync::Arc;

    fn write_inputs(dir: &Path) {
        fs::write(
            dir.join("owid-co2-data.csv"),
            "iso_code,country,year,co2_per_capita\n\
             USA,United States,2019,16.1\n\
             USA,United States,2020,14.2\n\
             GBR,United Kingdom,2020,4.9\n\
             ,EU-27,2020,6.2\n\
             CHN,China,2019,7.9\n\
             CHN,China,2020,8.2\n",
        )
        .unwrap();
        fs::write(dir.join("Climate-data.csv"), "Year,Value\n2020,1.0\n").unwrap();
        fs::write(
            dir.join("net-zero-target-set.csv"),
            "Entity,Code,Is there a net-zero target?\nChina,CHN,Yes\nChad,TCD,No\n",
        )
        .unwrap();
        fs::write(
            dir.join("temperature-anomaly.csv"),
            "Entity,Code,Year,Median,Upper,Lower\n\
             Global,,1850,-0.41,-0.24,-0.58\n\
             Global,,1851,-0.23,-0.08,-0.38\n\
             Tropics,,1850,-0.1,0.0,-0.2\n",
        )
        .unwrap();
        image::RgbImage::from_pixel(4, 2, image::Rgb([200, 30, 30]))
            .save(dir.join("berkeley-temp-anomaly-map.png"))
            .unwrap();
    }

    fn config_for(dir: &Path) -> DashboardConfig {
        let mut config = DashboardConfig::default();
        config.data = DataConfig {
            data_dir: dir.to_path_buf(),
            ..DataConfig::default()
        };
        config.map.raster_width = 400;
        config
    }

    #[test]
    fn loads_every_chart_with_default_selection() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let config = config_for(dir.path());
        let mut cache = DatasetCache::new(config.data.clone());
        let ctx = egui::Context::default();

        let dashboard = Dashboard::load(&ctx, &config, &mut cache).unwrap();

        assert_eq!(cache.len(), 4);
        assert!(dashboard.geometry.is_none());
        assert_eq!(dashboard.temperature_trend.series.len(), 3);
        assert_eq!(
            dashboard.co2_trend.series_names(),
            vec!["United States", "United Kingdom", "EU-27", "China"]
        );
        assert_eq!(dashboard.co2_map.chart.regions.len(), 3);
        assert_eq!(dashboard.net_zero_map.chart.regions.len(), 2);
        assert_eq!(dashboard.anomaly_image.size(), [4, 2]);
    }

    #[test]
    fn selection_change_rebuilds_only_the_trend() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let config = config_for(dir.path());
        let mut cache = DatasetCache::new(config.data.clone());
        let ctx = egui::Context::default();
        let mut dashboard = Dashboard::load(&ctx, &config, &mut cache).unwrap();
        let temperature_before = dashboard.temperature_trend.clone();
        let map_before = dashboard.co2_map.chart.clone();
        let co2_before = cache.dataset(Dataset::Co2).unwrap();

        dashboard.selection.clear();
        dashboard.selection.add("China");
        dashboard.refresh_co2_trend(&mut cache).unwrap();
        assert_eq!(dashboard.co2_trend.series_names(), vec!["China"]);

        // Edits on disk are not seen once a file is cached
        fs::remove_file(dir.path().join("owid-co2-data.csv")).unwrap();
        dashboard.selection.clear();
        dashboard.refresh_co2_trend(&mut cache).unwrap();
        assert!(dashboard.co2_trend.series.is_empty());

        assert_eq!(cache.len(), 4);
        assert!(Arc::ptr_eq(&co2_before, &cache.dataset(Dataset::Co2).unwrap()));
        assert_eq!(dashboard.temperature_trend, temperature_before);
        assert_eq!(dashboard.co2_map.chart, map_before);
    }

    #[test]
    fn missing_input_aborts_loading() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        fs::remove_file(dir.path().join("Climate-data.csv")).unwrap();
        let config = config_for(dir.path());
        let mut cache = DatasetCache::new(config.data.clone());

        let result = Dashboard::load(&egui::Context::default(), &config, &mut cache);
        assert!(matches!(result, Err(DashboardError::Loader(LoaderError::NotFound(_)))));
    }

    #[test]
    fn missing_image_aborts_loading() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        fs::remove_file(dir.path().join("berkeley-temp-anomaly-map.png")).unwrap();
        let config = config_for(dir.path());
        let mut cache = DatasetCache::new(config.data.clone());

        let result = Dashboard::load(&egui::Context::default(), &config, &mut cache);
        assert!(matches!(result, Err(DashboardError::Image { .. })));
    }

    #[test]
    fn rasterized_map_saves_as_png() {
        let dir = tempfile::tempdir().unwrap();
        write_inputs(dir.path());
        let config = config_for(dir.path());
        let mut cache = DatasetCache::new(config.data.clone());
        let dashboard =
            Dashboard::load(&egui::Context::default(), &config, &mut cache).unwrap();

        let out = tempfile::tempdir().unwrap();
        StaticChartRenderer::save_map(&dashboard.co2_map.raster, &out.path().join("map.png"))
            .unwrap();
        let written = image::open(out.path().join("map.png")).unwrap();
        assert_eq!(written.width(), 400);
    }
}
