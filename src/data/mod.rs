//! Data module - CSV loading, slicing and map geometry

mod geometry;
mod loader;
mod processor;

pub use geometry::{GeometryError, WorldGeometry};
pub use loader::{Dataset, DatasetCache, LoaderError};
pub use processor::DataProcessor;
