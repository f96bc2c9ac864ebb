//! Outlier handling for numeric feature columns.
//!
//! Bounds are the Tukey fences Q1 - k*IQR and Q3 + k*IQR (k = 1.5 by
//! default). The default strategy clamps values to the nearest bound, which
//! keeps the row count unchanged; removal drops the whole row instead.
//! Identifier and target columns are never touched.

use polars::prelude::*;
use tracing::{debug, warn};

use crate::config::{OutlierStrategy, PipelineConfig};
use crate::error::Result;
use crate::schema::DatasetSchema;
use crate::stats;

/// Handles outlier detection and treatment.
pub struct OutlierHandler;

impl OutlierHandler {
    /// Apply the configured outlier strategy to the schema's numeric features.
    ///
    /// Returns the number of values capped (for `Cap`) or rows removed
    /// (for `Remove`).
    pub fn handle(
        df: &mut DataFrame,
        schema: &DatasetSchema,
        config: &PipelineConfig,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let columns = schema.numeric_feature_columns();

        match config.outlier_strategy {
            OutlierStrategy::Cap => {
                Self::cap_outliers(df, &columns, config.iqr_multiplier, processing_steps)
            }
            OutlierStrategy::Remove => {
                Self::remove_outliers(df, &columns, config.iqr_multiplier, processing_steps)
            }
            OutlierStrategy::Keep => {
                processing_steps.push("Kept all outliers".to_string());
                debug!("Outlier handling disabled, keeping all values");
                Ok(0)
            }
        }
    }

    /// Clamp out-of-bound values to the IQR fences. Row count is preserved.
    pub fn cap_outliers(
        df: &mut DataFrame,
        columns: &[&str],
        multiplier: f64,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let mut total_capped = 0;

        for col_name in columns {
            let series = df.column(col_name)?.as_materialized_series().clone();
            let Some(quartiles) = stats::quartiles(&series)? else {
                warn!("Column '{}' has no valid values, skipping capping", col_name);
                continue;
            };
            let (lower, upper) = quartiles.bounds(multiplier);

            let cast = series.cast(&DataType::Float64)?;
            let chunked = cast.f64()?;

            let outliers = chunked
                .into_iter()
                .filter(|v| v.map(|val| val < lower || val > upper).unwrap_or(false))
                .count();

            if outliers == 0 {
                continue;
            }

            let capped = chunked.apply(|v| v.map(|val| val.clamp(lower, upper)));
            df.replace(col_name, capped.into_series())?;

            total_capped += outliers;
            processing_steps.push(format!(
                "Capped {} outliers in '{}' to [{:.4}, {:.4}]",
                outliers, col_name, lower, upper
            ));
        }

        debug!("Capped {} outliers at IQR bounds", total_capped);
        Ok(total_capped)
    }

    /// Drop rows holding out-of-bound values. Returns the rows removed.
    pub fn remove_outliers(
        df: &mut DataFrame,
        columns: &[&str],
        multiplier: f64,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let original_rows = df.height();

        for col_name in columns {
            let series = df.column(col_name)?.as_materialized_series().clone();
            let Some(quartiles) = stats::quartiles(&series)? else {
                continue;
            };
            let (lower, upper) = quartiles.bounds(multiplier);

            let cast = series.cast(&DataType::Float64)?;
            let chunked = cast.f64()?;

            let mut mask_values = Vec::with_capacity(chunked.len());
            for opt_val in chunked.into_iter() {
                match opt_val {
                    Some(val) => mask_values.push(val >= lower && val <= upper),
                    // Keep null values; imputation owns those
                    None => mask_values.push(true),
                }
            }

            let mask = BooleanChunked::from_slice("mask".into(), &mask_values);
            *df = df.filter(&mask)?;
        }

        let rows_removed = original_rows - df.height();
        if rows_removed > 0 {
            processing_steps.push(format!("Removed {} rows containing outliers", rows_removed));
            debug!("Removed {} outlier rows", rows_removed);
        }

        Ok(rows_removed)
    }
}
