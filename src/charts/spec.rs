//! Chart Specifications
//! Renderer-independent descriptions of the dashboard charts.

use super::scale::ColorScale;
use egui::Color32;

/// Where the legend sits inside a line chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    #[default]
    TopRight,
    TopLeft,
}

/// One named line.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    /// `[x, y]` pairs sorted by x
    pub points: Vec<[f64; 2]>,
}

impl Series {
    /// Pair up two columns, dropping rows where either side is missing.
    pub fn from_columns(name: impl Into<String>, xs: &[Option<f64>], ys: &[Option<f64>]) -> Self {
        let mut points: Vec<[f64; 2]> = xs
            .iter()
            .zip(ys)
            .filter_map(|(x, y)| Some([(*x)?, (*y)?]))
            .collect();
        points.sort_by(|a, b| a[0].total_cmp(&b[0]));
        Self {
            name: name.into(),
            points,
        }
    }
}

/// Multi-series line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub title: String,
    pub subtitle: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub legend: LegendPosition,
    pub series: Vec<Series>,
}

impl LineChart {
    pub fn series_names(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn x_range(&self) -> Option<(f64, f64)> {
        Self::range(self.series.iter().flat_map(|s| s.points.iter().map(|p| p[0])))
    }

    pub fn y_range(&self) -> Option<(f64, f64)> {
        Self::range(self.series.iter().flat_map(|s| s.points.iter().map(|p| p[1])))
    }

    fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
        values.fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }
}

/// Value a region is colored by.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionValue {
    Number(f64),
    Category(String),
    Missing,
}

impl std::fmt::Display for RegionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionValue::Number(v) => write!(f, "{:.2}", v),
            RegionValue::Category(c) => f.write_str(c),
            RegionValue::Missing => f.write_str("no data"),
        }
    }
}

/// One location on a choropleth.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// ISO-3 code
    pub code: String,
    /// Hover name
    pub name: String,
    pub value: RegionValue,
}

/// World map colored by a per-region value.
#[derive(Debug, Clone, PartialEq)]
pub struct Choropleth {
    pub title: String,
    pub value_label: String,
    pub regions: Vec<Region>,
    pub scale: ColorScale,
}

impl Choropleth {
    pub fn region(&self, code: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.code == code)
    }

    pub fn color_of(&self, region: &Region) -> Color32 {
        self.scale.color_for(&region.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_skips_missing_points_and_sorts() {
        let xs = [Some(2001.0), Some(2000.0), None, Some(2002.0)];
        let ys = [Some(1.5), Some(1.0), Some(9.0), None];
        let series = Series::from_columns("China", &xs, &ys);
        assert_eq!(series.points, vec![[2000.0, 1.0], [2001.0, 1.5]]);
    }

    #[test]
    fn ranges_span_all_series() {
        let chart = LineChart {
            title: String::new(),
            subtitle: None,
            x_label: "year".into(),
            y_label: "value".into(),
            legend: LegendPosition::TopLeft,
            series: vec![
                Series::from_columns("a", &[Some(1.0), Some(3.0)], &[Some(-1.0), Some(2.0)]),
                Series::from_columns("b", &[Some(0.0)], &[Some(5.0)]),
            ],
        };
        assert_eq!(chart.x_range(), Some((0.0, 3.0)));
        assert_eq!(chart.y_range(), Some((-1.0, 5.0)));
        assert_eq!(chart.series_names(), vec!["a", "b"]);
    }

    #[test]
    fn empty_chart_has_no_range() {
        let chart = LineChart {
            title: String::new(),
            subtitle: None,
            x_label: String::new(),
            y_label: String::new(),
            legend: LegendPosition::default(),
            series: Vec::new(),
        };
        assert_eq!(chart.x_range(), None);
    }
}
