//! Standardization of feature columns.
//!
//! Every selected column is transformed to (x - mean) / std using the
//! population standard deviation (ddof = 0). The target column is excluded
//! and keeps its original scale. A zero-variance column cannot be
//! standardized and fails the run with a scaling error; substituting a
//! no-op was considered and rejected in favor of failing fast.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PreprocessError, Result};
use crate::stats;

/// Mean and standard deviation fitted for one column.
///
/// Computed once per run, applied once, returned with the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnScaling {
    pub column: String,
    pub mean: f64,
    pub std: f64,
}

/// Standardizes feature columns to zero mean and unit variance.
pub struct StandardScaler;

impl StandardScaler {
    /// Fit scaling parameters for the listed columns.
    pub fn fit(df: &DataFrame, columns: &[String]) -> Result<Vec<ColumnScaling>> {
        let mut params = Vec::with_capacity(columns.len());

        for col_name in columns {
            let series = df.column(col_name)?.as_materialized_series().clone();
            let values = stats::numeric_values(&series)?;
            let (mean, std) = stats::mean_std(&values)
                .ok_or_else(|| PreprocessError::NoValidValues(col_name.clone()))?;

            if std == 0.0 || !std.is_finite() {
                return Err(PreprocessError::Scaling {
                    column: col_name.clone(),
                });
            }

            params.push(ColumnScaling {
                column: col_name.clone(),
                mean,
                std,
            });
        }

        Ok(params)
    }

    /// Apply fitted parameters in place.
    pub fn apply(df: &mut DataFrame, params: &[ColumnScaling]) -> Result<()> {
        for param in params {
            let series = df.column(&param.column)?.as_materialized_series().clone();
            let cast = series.cast(&DataType::Float64)?;
            let scaled = cast
                .f64()?
                .apply(|v| v.map(|val| (val - param.mean) / param.std));
            df.replace(&param.column, scaled.into_series())?;
        }
        Ok(())
    }

    /// Fit and apply in one pass. Returns the fitted parameters.
    pub fn fit_transform(
        df: &mut DataFrame,
        columns: &[String],
        processing_steps: &mut Vec<String>,
    ) -> Result<Vec<ColumnScaling>> {
        let params = Self::fit(df, columns)?;
        Self::apply(df, &params)?;

        processing_steps.push(format!(
            "Standardized {} feature columns to mean 0, std 1",
            params.len()
        ));
        debug!("Standardized {} columns", params.len());

        Ok(params)
    }
}
