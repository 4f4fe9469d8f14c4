//! Color Scales
//! Sequential and qualitative palettes shared by the interactive and static renderers.

use super::spec::RegionValue;
use egui::Color32;

/// ColorBrewer "Reds", light to dark.
pub const REDS: [Color32; 9] = [
    Color32::from_rgb(255, 245, 240),
    Color32::from_rgb(254, 224, 210),
    Color32::from_rgb(252, 187, 161),
    Color32::from_rgb(252, 146, 114),
    Color32::from_rgb(251, 106, 74),
    Color32::from_rgb(239, 59, 44),
    Color32::from_rgb(203, 24, 29),
    Color32::from_rgb(165, 15, 21),
    Color32::from_rgb(103, 0, 13),
];

/// Qualitative palette for categories and line series.
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(99, 110, 250),  // Blue
    Color32::from_rgb(239, 85, 59),   // Red
    Color32::from_rgb(0, 204, 150),   // Green
    Color32::from_rgb(171, 99, 250),  // Purple
    Color32::from_rgb(255, 161, 90),  // Orange
    Color32::from_rgb(25, 211, 243),  // Cyan
    Color32::from_rgb(255, 102, 146), // Pink
    Color32::from_rgb(182, 232, 128), // Light Green
    Color32::from_rgb(255, 151, 255), // Magenta
    Color32::from_rgb(254, 203, 82),  // Yellow
];

/// Regions with no value
pub const MISSING_COLOR: Color32 = Color32::from_rgb(220, 220, 220);

/// Map background (ocean)
pub const OCEAN_COLOR: Color32 = Color32::from_rgb(250, 250, 252);

/// Color of the n-th line series or category.
pub fn palette_color(index: usize) -> Color32 {
    PALETTE[index % PALETTE.len()]
}

/// How region values map to colors.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorScale {
    /// Linear interpolation over `stops`, values clamped to `[min, max]`.
    Continuous {
        min: f64,
        max: f64,
        stops: Vec<Color32>,
    },
    /// One fixed color per category.
    Categorical { categories: Vec<(String, Color32)> },
}

impl ColorScale {
    pub fn reds(min: f64, max: f64) -> Self {
        ColorScale::Continuous {
            min,
            max,
            stops: REDS.to_vec(),
        }
    }

    /// Assign palette colors to categories in the given order.
    pub fn categorical<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColorScale::Categorical {
            categories: categories
                .into_iter()
                .enumerate()
                .map(|(i, c)| (c.into(), palette_color(i)))
                .collect(),
        }
    }

    pub fn color_for(&self, value: &RegionValue) -> Color32 {
        match (self, value) {
            (ColorScale::Continuous { min, max, stops }, RegionValue::Number(v)) => {
                let span = max - min;
                let t = if span > 0.0 { (v - min) / span } else { 0.0 };
                interpolate(stops, t)
            }
            (ColorScale::Categorical { categories }, RegionValue::Category(c)) => categories
                .iter()
                .find(|(name, _)| name == c)
                .map(|(_, color)| *color)
                .unwrap_or(MISSING_COLOR),
            _ => MISSING_COLOR,
        }
    }
}

/// Color at `t` in `[0, 1]` along evenly spaced stops.
pub fn interpolate(stops: &[Color32], t: f64) -> Color32 {
    match stops.len() {
        0 => MISSING_COLOR,
        1 => stops[0],
        n => {
            let pos = t.clamp(0.0, 1.0) * (n - 1) as f64;
            let i = (pos.floor() as usize).min(n - 2);
            let frac = pos - i as f64;
            let (a, b) = (stops[i], stops[i + 1]);
            let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * frac).round() as u8;
            Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
        }
    }
}
