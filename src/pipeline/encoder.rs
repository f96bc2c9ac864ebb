//! Label encoding of categorical columns.
//!
//! Each distinct value of a categorical column gets an integer code. Codes
//! are assigned in sorted order of the distinct values, starting at 0, so
//! identical data always produces identical codes regardless of row order.
//! Maps are fitted on the full working table before any split.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PreprocessError, Result};

/// A fitted encoding for one categorical column.
///
/// `categories` is sorted; a value's code is its position. Built fresh per
/// run and returned with the result, never cached across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingMap {
    pub column: String,
    pub categories: Vec<String>,
}

impl EncodingMap {
    /// Fit an encoding over the distinct non-null values of a column.
    pub fn fit(column: &str, series: &Series) -> Result<Self> {
        let non_null = series.drop_nulls();
        if non_null.is_empty() {
            return Err(PreprocessError::NoValidValues(column.to_string()));
        }

        let cast = non_null.cast(&DataType::String)?;
        let chunked = cast.str()?;

        let mut categories: Vec<String> =
            chunked.into_iter().flatten().map(str::to_string).collect();
        categories.sort();
        categories.dedup();

        Ok(Self {
            column: column.to_string(),
            categories,
        })
    }

    /// Number of distinct categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Code assigned to a category, if it was seen during fitting.
    pub fn code_of(&self, value: &str) -> Option<i32> {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
            .map(|idx| idx as i32)
    }

    /// Category behind a code.
    pub fn decode(&self, code: i32) -> Option<&str> {
        if code < 0 {
            return None;
        }
        self.categories.get(code as usize).map(String::as_str)
    }

    /// Replace the column's values with their integer codes (`Int32`).
    pub fn apply(&self, df: &mut DataFrame) -> Result<()> {
        let series = df.column(&self.column)?.as_materialized_series().clone();
        let cast = series.cast(&DataType::String)?;
        let chunked = cast.str()?;

        let mut codes: Vec<i32> = Vec::with_capacity(chunked.len());
        for val in chunked.into_iter() {
            let val = val.ok_or_else(|| PreprocessError::NoValidValues(self.column.clone()))?;
            let code = self.code_of(val).ok_or_else(|| {
                PreprocessError::InvalidConfig(format!(
                    "value '{}' in column '{}' was not seen when fitting the encoder",
                    val, self.column
                ))
            })?;
            codes.push(code);
        }

        df.replace(&self.column, Series::new(self.column.as_str().into(), codes))?;
        Ok(())
    }
}

/// Fits and applies encodings for a set of categorical columns.
pub struct LabelEncoder;

impl LabelEncoder {
    /// Encode every listed column in place, returning the fitted maps.
    pub fn encode_columns(
        df: &mut DataFrame,
        columns: &[String],
        processing_steps: &mut Vec<String>,
    ) -> Result<Vec<EncodingMap>> {
        let mut encodings = Vec::with_capacity(columns.len());

        for col_name in columns {
            let series = df.column(col_name)?.as_materialized_series().clone();
            let map = EncodingMap::fit(col_name, &series)?;
            map.apply(df)?;

            processing_steps.push(format!(
                "Label-encoded '{}' ({} categories)",
                col_name,
                map.len()
            ));
            debug!("Encoded '{}' with {} categories", col_name, map.len());

            encodings.push(map);
        }

        Ok(encodings)
    }
}
