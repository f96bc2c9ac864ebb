//! Result types returned by a pipeline run.

use chrono::{DateTime, Utc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::pipeline::encoder::EncodingMap;
use crate::pipeline::scaler::ColumnScaling;

/// Everything a pipeline run produces.
///
/// The working table is fully transformed; the optional partitions are
/// present when splitting is enabled. Encoding maps and scaling parameters
/// are the per-run fitted state, returned explicitly so runs stay
/// independently reproducible (no module-level fitted state).
#[derive(Debug)]
pub struct PipelineResult {
    /// The fully transformed output table, target column last.
    pub data: DataFrame,
    /// Train partition, when splitting is enabled.
    pub train: Option<DataFrame>,
    /// Test partition, when splitting is enabled.
    pub test: Option<DataFrame>,
    /// Label-encoding maps fitted during this run, one per categorical column.
    pub encodings: Vec<EncodingMap>,
    /// Mean/std used to standardize each scaled column.
    pub scaling: Vec<ColumnScaling>,
    /// Human-readable log of every action taken, in order.
    pub processing_steps: Vec<String>,
    /// Aggregate counters for the run.
    pub summary: RunSummary,
}

/// Aggregate counters for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Dataset schema name.
    pub dataset: String,

    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    /// Number of rows before preprocessing.
    pub rows_before: usize,
    /// Number of rows after preprocessing.
    pub rows_after: usize,
    /// Number of duplicate rows removed.
    pub duplicates_removed: usize,

    /// Number of columns before preprocessing.
    pub columns_before: usize,
    /// Number of columns after preprocessing.
    pub columns_after: usize,

    /// Number of missing cells filled by imputation.
    pub cells_imputed: usize,
    /// Number of values clamped to the IQR bounds.
    pub outliers_capped: usize,

    /// Row counts of the train/test partitions, when splitting is enabled.
    pub train_rows: Option<usize>,
    pub test_rows: Option<usize>,

    /// When the run finished.
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn new(dataset: impl Into<String>) -> Self {
        Self {
            dataset: dataset.into(),
            duration_ms: 0,
            rows_before: 0,
            rows_after: 0,
            duplicates_removed: 0,
            columns_before: 0,
            columns_after: 0,
            cells_imputed: 0,
            outliers_capped: 0,
            train_rows: None,
            test_rows: None,
            finished_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serialization() {
        let mut summary = RunSummary::new("wine_quality");
        summary.rows_before = 1143;
        summary.rows_after = 1018;
        summary.duplicates_removed = 125;

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("wine_quality"));
        assert!(json.contains("1018"));

        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rows_after, 1018);
    }
}
