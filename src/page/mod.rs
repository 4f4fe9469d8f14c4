//! Page module - narrative text and section layout

mod layout;
mod markup;

pub use layout::{column_widths, compose, Body, ChartSlot, Page, Pane};
pub use markup::{Paragraph, Span};
