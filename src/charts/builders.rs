//! Chart Builders
//! Pure mappings from dataset slices to chart specifications.

use super::scale::ColorScale;
use super::spec::{Choropleth, LegendPosition, LineChart, Region, RegionValue, Series};
use crate::data::DataProcessor;
use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("{chart}: expected anomaly columns after the first three, found none")]
    MissingValueColumns { chart: &'static str },
}

/// Entity kept by the temperature chart.
pub const GLOBAL_ENTITY: &str = "Global";

// Temperature anomaly columns
const TEMP_ENTITY: &str = "Entity";
const TEMP_YEAR: &str = "Year";

// OWID CO2 columns
const CO2_ISO: &str = "iso_code";
const CO2_COUNTRY: &str = "country";
const CO2_YEAR: &str = "year";
const CO2_PER_CAPITA: &str = "co2_per_capita";

// Net-zero tracker columns
const NZ_CODE: &str = "Code";
const NZ_ENTITY: &str = "Entity";
const NZ_TARGET: &str = "Is there a net-zero target?";

/// Builds chart specifications. Holds no state between calls.
pub struct ChartFactory;

impl ChartFactory {
    /// Global land-sea temperature anomaly, one line per anomaly column.
    ///
    /// The series are the 4th to 6th columns of the file (estimate and its
    /// confidence bounds), plotted against `Year` for the `Global` entity only.
    pub fn temperature_trend(df: &DataFrame) -> Result<LineChart, ChartError> {
        let global = DataProcessor::filter_equals(df, TEMP_ENTITY, GLOBAL_ENTITY)?;
        let value_columns = DataProcessor::columns_between(&global, 3, 6);
        if value_columns.is_empty() {
            return Err(ChartError::MissingValueColumns {
                chart: "temperature trend",
            });
        }

        let years = DataProcessor::numeric_values(&global, TEMP_YEAR)?;
        let series = value_columns
            .iter()
            .map(|column| -> Result<Series, ChartError> {
                let values = DataProcessor::numeric_values(&global, column)?;
                Ok(Series::from_columns(column.as_str(), &years, &values))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(LineChart {
            title: "Global Average Temperature Anomaly".to_string(),
            subtitle: Some(
                "Global average land-sea temperature anomaly relative to the 1961-1990 average temperature"
                    .to_string(),
            ),
            x_label: TEMP_YEAR.to_string(),
            y_label: "Degree Celsius".to_string(),
            legend: LegendPosition::TopLeft,
            series,
        })
    }

    /// Per-capita CO2 for one year on a world map.
    pub fn co2_map(df: &DataFrame, year: i64, range: [f64; 2]) -> Result<Choropleth, ChartError> {
        let rows = DataProcessor::filter_year(df, CO2_YEAR, year)?;
        let codes = DataProcessor::string_values(&rows, CO2_ISO)?;
        let names = DataProcessor::string_values(&rows, CO2_COUNTRY)?;
        let values = DataProcessor::numeric_values(&rows, CO2_PER_CAPITA)?;

        let regions = codes
            .into_iter()
            .zip(names)
            .zip(values)
            .filter_map(|((code, name), value)| {
                let code = code?;
                Some(Region {
                    name: name.unwrap_or_else(|| code.clone()),
                    code,
                    value: value.map_or(RegionValue::Missing, RegionValue::Number),
                })
            })
            .collect();

        Ok(Choropleth {
            title: format!("CO2 Emission World Map in {}", year),
            value_label: CO2_PER_CAPITA.to_string(),
            regions,
            scale: ColorScale::reds(range[0], range[1]),
        })
    }

    /// Per-capita CO2 over time, one line per selected country.
    ///
    /// Lines appear in the order the countries first occur in the data. An
    /// empty selection gives a chart with no series.
    pub fn co2_trend(df: &DataFrame, selected: &[String]) -> Result<LineChart, ChartError> {
        let rows = DataProcessor::filter_in(df, CO2_COUNTRY, selected)?;
        let countries = DataProcessor::string_values(&rows, CO2_COUNTRY)?;
        let years = DataProcessor::numeric_values(&rows, CO2_YEAR)?;
        let values = DataProcessor::numeric_values(&rows, CO2_PER_CAPITA)?;

        let mut order: Vec<String> = Vec::new();
        let mut columns: HashMap<String, (Vec<Option<f64>>, Vec<Option<f64>>)> = HashMap::new();
        for ((country, year), value) in countries.into_iter().zip(years).zip(values) {
            let Some(country) = country else { continue };
            let entry = columns.entry(country.clone()).or_insert_with(|| {
                order.push(country);
                (Vec::new(), Vec::new())
            });
            entry.0.push(year);
            entry.1.push(value);
        }

        let series = order
            .into_iter()
            .map(|country| {
                let (xs, ys) = columns.remove(&country).unwrap_or_default();
                Series::from_columns(country, &xs, &ys)
            })
            .collect();

        Ok(LineChart {
            title: "CO2 Emission Per Capita".to_string(),
            subtitle: None,
            x_label: CO2_YEAR.to_string(),
            y_label: CO2_PER_CAPITA.to_string(),
            legend: LegendPosition::TopRight,
            series,
        })
    }

    /// Net-zero commitment status on a world map, one color per status.
    pub fn net_zero_map(df: &DataFrame) -> Result<Choropleth, ChartError> {
        let codes = DataProcessor::string_values(df, NZ_CODE)?;
        let names = DataProcessor::string_values(df, NZ_ENTITY)?;
        let targets = DataProcessor::string_values(df, NZ_TARGET)?;

        let mut categories: Vec<String> = Vec::new();
        let mut regions = Vec::new();
        for ((code, name), target) in codes.into_iter().zip(names).zip(targets) {
            let Some(code) = code else { continue };
            let value = match target {
                Some(target) => {
                    if !categories.contains(&target) {
                        categories.push(target.clone());
                    }
                    RegionValue::Category(target)
                }
                None => RegionValue::Missing,
            };
            regions.push(Region {
                name: name.unwrap_or_else(|| code.clone()),
                code,
                value,
            });
        }

        Ok(Choropleth {
            title: "Net-Zero Emission Targets".to_string(),
            value_label: NZ_TARGET.to_string(),
            regions,
            scale: ColorScale::categorical(categories),
        })
    }
}
