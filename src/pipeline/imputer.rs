//! Missing-value imputation.
//!
//! Numeric columns are filled with their median (or mean), categorical
//! columns with their mode (or a constant). After this stage no column in
//! the working table contains nulls.
//!
//! An entirely-missing column has no median or mode; the documented fallback
//! is `0.0` for numeric columns and `"Unknown"` for categorical ones.

use polars::prelude::*;
use tracing::{debug, warn};

use crate::config::{CategoricalImputation, NumericImputation, PipelineConfig};
use crate::error::Result;
use crate::schema::DatasetSchema;
use crate::stats::string_mode;

/// Fallback fill for an entirely-null numeric column.
const NUMERIC_FALLBACK: f64 = 0.0;
/// Fallback fill for an entirely-null categorical column.
const CATEGORICAL_FALLBACK: &str = "Unknown";

/// Statistical imputation over the schema's columns.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill every missing value in the table, per the configured strategies.
    ///
    /// The target column counts as numeric. Identifier columns are skipped;
    /// they are dropped later and never feed a model. Returns the number of
    /// cells filled.
    pub fn impute(
        df: &mut DataFrame,
        schema: &DatasetSchema,
        config: &PipelineConfig,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let mut cells_imputed = 0;

        let mut numeric_cols: Vec<&str> = schema.numeric_feature_columns();
        numeric_cols.push(schema.target()?);

        for col_name in numeric_cols {
            cells_imputed += match config.numeric_imputation {
                NumericImputation::Median => {
                    Self::apply_numeric_median(df, col_name, processing_steps)?
                }
                NumericImputation::Mean => {
                    Self::apply_numeric_mean(df, col_name, processing_steps)?
                }
            };
        }

        for col_name in schema.categorical_columns() {
            cells_imputed += match config.categorical_imputation {
                CategoricalImputation::Mode => {
                    Self::apply_mode_imputation(df, col_name, processing_steps)?
                }
                CategoricalImputation::Constant => Self::apply_constant_imputation(
                    df,
                    col_name,
                    CATEGORICAL_FALLBACK,
                    processing_steps,
                )?,
            };
        }

        debug!("Imputed {} missing cells", cells_imputed);
        Ok(cells_imputed)
    }

    /// Apply median imputation to a numeric column. Returns cells filled.
    pub fn apply_numeric_median(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let fill_value = match series.median() {
            Some(v) => v,
            None => {
                warn!(
                    "Column '{}' is entirely missing, falling back to {}",
                    col_name, NUMERIC_FALLBACK
                );
                NUMERIC_FALLBACK
            }
        };
        Self::fill_numeric(df, col_name, fill_value, &series, processing_steps, "median")
    }

    /// Apply mean imputation to a numeric column. Returns cells filled.
    pub fn apply_numeric_mean(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let fill_value = match series.mean() {
            Some(v) => v,
            None => {
                warn!(
                    "Column '{}' is entirely missing, falling back to {}",
                    col_name, NUMERIC_FALLBACK
                );
                NUMERIC_FALLBACK
            }
        };
        Self::fill_numeric(df, col_name, fill_value, &series, processing_steps, "mean")
    }

    /// Apply mode imputation to a categorical column. Returns cells filled.
    pub fn apply_mode_imputation(
        df: &mut DataFrame,
        col_name: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let null_count = series.null_count();
        if null_count == 0 {
            return Ok(0);
        }

        let mode_val = match string_mode(&series) {
            Some(v) => v,
            None => {
                warn!(
                    "Column '{}' is entirely missing, falling back to '{}'",
                    col_name, CATEGORICAL_FALLBACK
                );
                CATEGORICAL_FALLBACK.to_string()
            }
        };

        let filled = Self::fill_string_nulls(&series, &mode_val)?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled {} missing values in '{}' with mode: '{}'",
            null_count, col_name, mode_val
        ));
        Ok(null_count)
    }

    /// Fill a categorical column's nulls with a constant. Returns cells filled.
    pub fn apply_constant_imputation(
        df: &mut DataFrame,
        col_name: &str,
        constant: &str,
        processing_steps: &mut Vec<String>,
    ) -> Result<usize> {
        let series = df.column(col_name)?.as_materialized_series().clone();
        let null_count = series.null_count();
        if null_count == 0 {
            return Ok(0);
        }

        let filled = Self::fill_string_nulls(&series, constant)?;
        df.replace(col_name, filled)?;

        processing_steps.push(format!(
            "Filled {} missing values in '{}' with constant: '{}'",
            null_count, col_name, constant
        ));
        Ok(null_count)
    }

    /// Fill a numeric column's nulls with a specific value.
    fn fill_numeric(
        df: &mut DataFrame,
        col_name: &str,
        fill_value: f64,
        series: &Series,
        processing_steps: &mut Vec<String>,
        method: &str,
    ) -> Result<usize> {
        let null_count = series.null_count();
        if null_count == 0 {
            return Ok(0);
        }

        let cast = series.cast(&DataType::Float64)?;
        let filled = cast.f64()?.apply(|v| v.or(Some(fill_value)));
        df.replace(col_name, filled.into_series())?;

        processing_steps.push(format!(
            "Filled {} missing values in '{}' with {}: {:.2}",
            null_count, col_name, method, fill_value
        ));
        Ok(null_count)
    }

    /// Fill nulls in a string column without disturbing present values.
    fn fill_string_nulls(series: &Series, fill_value: &str) -> Result<Series> {
        let cast = series.cast(&DataType::String)?;
        let chunked = cast.str()?;

        let mut result: Vec<String> = Vec::with_capacity(chunked.len());
        for val in chunked.into_iter() {
            result.push(
                val.map(|s| s.to_string())
                    .unwrap_or_else(|| fill_value.to_string()),
            );
        }

        Ok(Series::new(series.name().clone(), result))
    }
}
