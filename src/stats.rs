//! Per-column statistics used by the pipeline stages.
//!
//! Quantiles use linear interpolation between the two nearest order
//! statistics, mean/std use the population formula (ddof = 0). Both choices
//! match the statistics the output invariants are checked against.

use polars::prelude::*;

use crate::error::Result;

/// First and third quartile of a numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub q1: f64,
    pub q3: f64,
}

impl Quartiles {
    /// Interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Lower/upper fence at `multiplier` times the IQR beyond the quartiles.
    pub fn bounds(&self, multiplier: f64) -> (f64, f64) {
        let iqr = self.iqr();
        (self.q1 - multiplier * iqr, self.q3 + multiplier * iqr)
    }
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Extract the non-null values of a column as `f64`.
pub fn numeric_values(series: &Series) -> Result<Vec<f64>> {
    let cast = series.cast(&DataType::Float64)?;
    let chunked = cast.f64()?;
    Ok(chunked.into_iter().flatten().collect())
}

/// Quantile of an ascending-sorted slice with linear interpolation.
///
/// Returns `None` for an empty slice.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let weight = pos - lower as f64;
    Some(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
}

/// Q1/Q3 of a numeric column over its non-null values.
///
/// Returns `None` when the column holds no valid values.
pub fn quartiles(series: &Series) -> Result<Option<Quartiles>> {
    let mut values = numeric_values(series)?;
    if values.is_empty() {
        return Ok(None);
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let q1 = quantile_sorted(&values, 0.25).unwrap_or(0.0);
    let q3 = quantile_sorted(&values, 0.75).unwrap_or(0.0);
    Ok(Some(Quartiles { q1, q3 }))
}

/// Population mean and standard deviation (ddof = 0).
///
/// Returns `None` for an empty slice.
pub fn mean_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

/// Mode (most frequent value) of a string column.
///
/// Ties break deterministically towards the lexicographically smallest value,
/// so identical inputs always yield the same mode.
pub fn string_mode(series: &Series) -> Option<String> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return None;
    }

    let str_series = non_null.cast(&DataType::String).ok()?;
    let str_chunked = str_series.str().ok()?;

    let mut value_counts: std::collections::BTreeMap<String, usize> =
        std::collections::BTreeMap::new();
    for val in str_chunked.into_iter().flatten() {
        *value_counts.entry(val.to_string()).or_insert(0) += 1;
    }

    value_counts
        .into_iter()
        .max_by(|(a_val, a_count), (b_val, b_count)| {
            a_count.cmp(b_count).then(b_val.cmp(a_val))
        })
        .map(|(val, _)| val)
}
