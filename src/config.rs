//! Dashboard Configuration
//! Optional `dashboard.toml` in the working directory; every field has a default.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "dashboard.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },
    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub map: MapConfig,

    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub window: WindowConfig,
}

/// Input file locations
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_co2_file")]
    pub co2_file: String,

    #[serde(default = "default_climate_file")]
    pub climate_file: String,

    #[serde(default = "default_net_zero_file")]
    pub net_zero_file: String,

    #[serde(default = "default_temperature_file")]
    pub temperature_file: String,

    #[serde(default = "default_anomaly_map_image")]
    pub anomaly_map_image: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_co2_file() -> String {
    "owid-co2-data.csv".to_string()
}

fn default_climate_file() -> String {
    "Climate-data.csv".to_string()
}

fn default_net_zero_file() -> String {
    "net-zero-target-set.csv".to_string()
}

fn default_temperature_file() -> String {
    "temperature-anomaly.csv".to_string()
}

fn default_anomaly_map_image() -> String {
    "berkeley-temp-anomaly-map.png".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            co2_file: default_co2_file(),
            climate_file: default_climate_file(),
            net_zero_file: default_net_zero_file(),
            temperature_file: default_temperature_file(),
            anomaly_map_image: default_anomaly_map_image(),
        }
    }
}

impl DataConfig {
    /// Full path of the anomaly map image.
    pub fn image_path(&self) -> PathBuf {
        self.data_dir.join(&self.anomaly_map_image)
    }
}

/// Choropleth settings
#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_co2_year")]
    pub co2_year: i64,

    #[serde(default = "default_co2_color_range")]
    pub co2_color_range: [f64; 2],

    /// GeoJSON country outlines. Without it maps are drawn as a tile grid.
    #[serde(default = "default_geometry_file")]
    pub geometry_file: Option<PathBuf>,

    #[serde(default = "default_code_property")]
    pub code_property: String,

    #[serde(default = "default_raster_width")]
    pub raster_width: u32,
}

fn default_co2_year() -> i64 {
    2020
}

fn default_co2_color_range() -> [f64; 2] {
    [0.0, 25.0]
}

fn default_geometry_file() -> Option<PathBuf> {
    Some(PathBuf::from("world-countries.geojson"))
}

fn default_code_property() -> String {
    "ISO_A3".to_string()
}

fn default_raster_width() -> u32 {
    1200
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            co2_year: default_co2_year(),
            co2_color_range: default_co2_color_range(),
            geometry_file: default_geometry_file(),
            code_property: default_code_property(),
            raster_width: default_raster_width(),
        }
    }
}

/// Multi-select defaults
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    #[serde(default = "default_countries")]
    pub default_countries: Vec<String>,
}

fn default_countries() -> Vec<String> {
    ["United States", "United Kingdom", "EU-27", "China"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            default_countries: default_countries(),
        }
    }
}

/// Initial window size
#[derive(Debug, Clone, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_width")]
    pub width: f32,

    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_width() -> f32 {
    1600.0
}

fn default_height() -> f32 {
    1000.0
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Load `dashboard.toml` from the working directory, falling back to defaults.
    pub fn load_default() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            log::info!("No {} found, using defaults", CONFIG_FILE);
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Geometry path resolved against the data directory.
    pub fn geometry_path(&self) -> Option<PathBuf> {
        self.map
            .geometry_file
            .as_ref()
            .map(|file| self.data.data_dir.join(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_dashboard_inputs() {
        let config = DashboardConfig::default();
        assert_eq!(config.data.co2_file, "owid-co2-data.csv");
        assert_eq!(config.data.temperature_file, "temperature-anomaly.csv");
        assert_eq!(config.map.co2_year, 2020);
        assert_eq!(config.map.co2_color_range, [0.0, 25.0]);
        assert_eq!(
            config.selection.default_countries,
            vec!["United States", "United Kingdom", "EU-27", "China"]
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[data]\ndata_dir = \"/srv/climate\"\n\n[map]\nco2_year = 2019"
        )
        .unwrap();

        let config = DashboardConfig::load(file.path()).unwrap();
        assert_eq!(config.data.data_dir, PathBuf::from("/srv/climate"));
        assert_eq!(config.data.net_zero_file, "net-zero-target-set.csv");
        assert_eq!(config.map.co2_year, 2019);
        assert_eq!(config.map.code_property, "ISO_A3");
        assert_eq!(config.selection.default_countries.len(), 4);
        assert_eq!(
            config.data.image_path(),
            PathBuf::from("/srv/climate/berkeley-temp-anomaly-map.png")
        );
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[map\nco2_year = ").unwrap();

        let err = DashboardConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DashboardConfig::load(Path::new("/nonexistent/dashboard.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
