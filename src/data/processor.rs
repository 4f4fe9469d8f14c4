//! Data Processor Module
//! Declarative slices over loaded DataFrames. Every operation returns a new frame.

use polars::prelude::*;
use std::collections::HashSet;

/// Handles filtering and column extraction.
pub struct DataProcessor;

impl DataProcessor {
    /// Rows where a string column equals `value`.
    pub fn filter_equals(df: &DataFrame, column: &str, value: &str) -> PolarsResult<DataFrame> {
        df.clone()
            .lazy()
            .filter(col(column).eq(lit(value)))
            .collect()
    }

    /// Rows for a single year.
    pub fn filter_year(df: &DataFrame, column: &str, year: i64) -> PolarsResult<DataFrame> {
        df.clone()
            .lazy()
            .filter(col(column).eq(lit(year)))
            .collect()
    }

    /// Rows whose string column is one of `values`.
    ///
    /// An empty `values` slice keeps no rows.
    pub fn filter_in(df: &DataFrame, column: &str, values: &[String]) -> PolarsResult<DataFrame> {
        let wanted: HashSet<&str> = values.iter().map(String::as_str).collect();
        let mask: BooleanChunked = df
            .column(column)?
            .str()?
            .into_iter()
            .map(|v| Some(v.is_some_and(|s| wanted.contains(s))))
            .collect();
        df.filter(&mask)
    }

    /// Distinct non-null values of a string column, in order of first appearance.
    pub fn unique_in_order(df: &DataFrame, column: &str) -> PolarsResult<Vec<String>> {
        let mut seen = HashSet::new();
        Ok(df
            .column(column)?
            .str()?
            .into_iter()
            .flatten()
            .filter(|s| seen.insert(*s))
            .map(str::to_string)
            .collect())
    }

    /// A column cast to f64. Nulls and NaN become `None`.
    pub fn numeric_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<f64>>> {
        let values = df.column(column)?.cast(&DataType::Float64)?;
        Ok(values
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect())
    }

    /// A column cast to strings. Nulls and empty strings become `None`.
    pub fn string_values(df: &DataFrame, column: &str) -> PolarsResult<Vec<Option<String>>> {
        let values = df.column(column)?.cast(&DataType::String)?;
        Ok(values
            .str()?
            .into_iter()
            .map(|v| v.filter(|s| !s.is_empty()).map(str::to_string))
            .collect())
    }

    /// Column names from `start` (inclusive) to `end` (exclusive), clipped to the frame width.
    pub fn columns_between(df: &DataFrame, start: usize, end: usize) -> Vec<String> {
        df.get_column_names()
            .iter()
            .skip(start)
            .take(end.saturating_sub(start))
            .map(|s| s.to_string())
            .collect()
    }
}
