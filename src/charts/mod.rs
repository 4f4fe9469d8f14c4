//! Charts module - Chart specifications, builders and rendering

mod builders;
mod plotter;
mod renderer;
mod scale;
mod spec;

pub use builders::{ChartError, ChartFactory};
pub use plotter::{ChartPlotter, MapView};
pub use renderer::{RenderError, StaticChartRenderer};
pub use spec::LineChart;
