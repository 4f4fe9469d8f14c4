//! CSV Dataset Loader Module
//! Read-through cache of CSV files loaded with Polars.

use crate::config::DataConfig;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to load CSV {path}: {source}")]
    CsvError {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
}

/// The datasets the dashboard reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Co2,
    /// Loaded with the others but never rendered.
    Climate,
    NetZero,
    Temperature,
}

impl Dataset {
    /// Configured file name of this dataset.
    pub fn file_name(self, config: &DataConfig) -> &str {
        match self {
            Dataset::Co2 => &config.co2_file,
            Dataset::Climate => &config.climate_file,
            Dataset::NetZero => &config.net_zero_file,
            Dataset::Temperature => &config.temperature_file,
        }
    }
}

/// Session-scoped CSV cache.
///
/// The first request for a file reads it; every later request for the same
/// path returns the same `Arc` without touching the disk. Entries are never
/// invalidated, so edits to a file after its first load are not observed.
pub struct DatasetCache {
    config: DataConfig,
    frames: HashMap<PathBuf, Arc<DataFrame>>,
}

impl DatasetCache {
    pub fn new(config: DataConfig) -> Self {
        Self {
            config,
            frames: HashMap::new(),
        }
    }

    /// Load one of the known datasets.
    pub fn dataset(&mut self, dataset: Dataset) -> Result<Arc<DataFrame>, LoaderError> {
        let file = dataset.file_name(&self.config).to_string();
        self.load(&file)
    }

    /// Load a CSV file relative to the data directory.
    pub fn load(&mut self, file_name: &str) -> Result<Arc<DataFrame>, LoaderError> {
        let path = self.config.data_dir.join(file_name);

        if let Some(df) = self.frames.get(&path) {
            log::debug!("Cache hit for {}", path.display());
            return Ok(Arc::clone(df));
        }

        let df = Arc::new(Self::read_csv(&path)?);
        log::info!(
            "Loaded {}: {} rows, {} columns",
            path.display(),
            df.height(),
            df.width()
        );
        self.frames.insert(path, Arc::clone(&df));
        Ok(df)
    }

    /// Number of files read so far.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    fn read_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        // Schema inferred from every row
        LazyCsvReader::new(path)
            .with_infer_schema_length(None)
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(|source| LoaderError::CsvError {
                path: path.to_path_buf(),
                source,
            })
    }
}
