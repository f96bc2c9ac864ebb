//! Feature engineering.
//!
//! Evaluates the schema's declarative derived features (threshold bands and
//! weighted indices) and drops identifier columns. Every derived value is a
//! pure function of its own row; formulas and thresholds are fixed constants
//! on the schema.

use polars::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::schema::{DatasetSchema, DerivedFeature, IndexTerm};

/// Computes derived columns and strips identifiers.
pub struct FeatureEngineer;

impl FeatureEngineer {
    /// Append every derived column declared by the schema, then drop the
    /// identifier columns.
    pub fn engineer(
        df: &mut DataFrame,
        schema: &DatasetSchema,
        processing_steps: &mut Vec<String>,
    ) -> Result<()> {
        for feature in &schema.derived {
            match feature {
                DerivedFeature::Band {
                    source,
                    output,
                    thresholds,
                    labels,
                } => {
                    Self::add_band(df, source, output, thresholds, labels)?;
                    processing_steps.push(format!(
                        "Derived band column '{}' from '{}' ({} buckets)",
                        output,
                        source,
                        labels.len()
                    ));
                }
                DerivedFeature::WeightedIndex { output, terms } => {
                    Self::add_weighted_index(df, output, terms)?;
                    processing_steps.push(format!(
                        "Derived index column '{}' from {} terms",
                        output,
                        terms.len()
                    ));
                }
            }
            debug!("Derived column '{}'", feature.output());
        }

        for id_col in schema.identifier_columns() {
            *df = df.drop(id_col)?;
            processing_steps.push(format!("Dropped identifier column '{}'", id_col));
        }

        Ok(())
    }

    /// Bucket a continuous column into ordered labels.
    fn add_band(
        df: &mut DataFrame,
        source: &str,
        output: &str,
        thresholds: &[f64],
        labels: &[String],
    ) -> Result<()> {
        let series = df.column(source)?.as_materialized_series().clone();
        let cast = series.cast(&DataType::Float64)?;
        let chunked = cast.f64()?;

        let banded: Vec<Option<String>> = chunked
            .into_iter()
            .map(|v| v.map(|val| Self::band_label(val, thresholds, labels).to_string()))
            .collect();

        df.with_column(Series::new(output.into(), banded))?;
        Ok(())
    }

    /// Label for a value given ascending thresholds.
    fn band_label<'a>(value: f64, thresholds: &[f64], labels: &'a [String]) -> &'a str {
        for (i, threshold) in thresholds.iter().enumerate() {
            if value < *threshold {
                return &labels[i];
            }
        }
        &labels[labels.len() - 1]
    }

    /// Weighted sum of min-max-normalized terms.
    fn add_weighted_index(df: &mut DataFrame, output: &str, terms: &[IndexTerm]) -> Result<()> {
        let height = df.height();
        let mut acc = vec![0.0f64; height];
        let mut missing = vec![false; height];

        for term in terms {
            let series = df.column(&term.column)?.as_materialized_series().clone();
            let cast = series.cast(&DataType::Float64)?;
            let chunked = cast.f64()?;

            for (i, opt_val) in chunked.into_iter().enumerate() {
                match opt_val {
                    Some(val) => acc[i] += term.weight * Self::normalize(val, term),
                    None => missing[i] = true,
                }
            }
        }

        let values: Vec<Option<f64>> = acc
            .into_iter()
            .zip(missing)
            .map(|(v, m)| if m { None } else { Some(v) })
            .collect();

        df.with_column(Series::new(output.into(), values))?;
        Ok(())
    }

    /// Min-max normalize against the term's fixed range, clamped to [0, 1],
    /// inverted when the term asks for it.
    fn normalize(value: f64, term: &IndexTerm) -> f64 {
        let t = ((value - term.min) / (term.max - term.min)).clamp(0.0, 1.0);
        if term.invert { 1.0 - t } else { t }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ColumnRole, ColumnSpec};
    use std::path::PathBuf;

    fn band_labels() -> Vec<String> {
        vec![
            "Low".to_string(),
            "Medium".to_string(),
            "High".to_string(),
        ]
    }

    #[test]
    fn test_band_label_edges() {
        let thresholds = [10.0, 20.0];
        let labels = band_labels();

        assert_eq!(FeatureEngineer::band_label(5.0, &thresholds, &labels), "Low");
        assert_eq!(
            FeatureEngineer::band_label(10.0, &thresholds, &labels),
            "Medium",
            "a value equal to a threshold falls into the upper bucket"
        );
        assert_eq!(
            FeatureEngineer::band_label(19.9, &thresholds, &labels),
            "Medium"
        );
        assert_eq!(
            FeatureEngineer::band_label(50.0, &thresholds, &labels),
            "High"
        );
    }

    #[test]
    fn test_add_band_column() {
        let mut df = df!["temp" => [5.0, 15.0, 25.0]].unwrap();
        FeatureEngineer::add_band(&mut df, "temp", "temp_band", &[10.0, 20.0], &band_labels())
            .unwrap();

        let band = df.column("temp_band").unwrap();
        assert_eq!(band.str().unwrap().get(0).unwrap(), "Low");
        assert_eq!(band.str().unwrap().get(1).unwrap(), "Medium");
        assert_eq!(band.str().unwrap().get(2).unwrap(), "High");
    }

    #[test]
    fn test_normalize_clamps_and_inverts() {
        let term = IndexTerm {
            column: "x".to_string(),
            weight: 1.0,
            min: 0.0,
            max: 10.0,
            invert: false,
        };
        assert_eq!(FeatureEngineer::normalize(5.0, &term), 0.5);
        assert_eq!(FeatureEngineer::normalize(-3.0, &term), 0.0);
        assert_eq!(FeatureEngineer::normalize(42.0, &term), 1.0);

        let inverted = IndexTerm { invert: true, ..term };
        assert_eq!(FeatureEngineer::normalize(2.0, &inverted), 0.8);
    }

    #[test]
    fn test_weighted_index_combines_terms() {
        let mut df = df![
            "a" => [0.0, 10.0],
            "b" => [10.0, 0.0],
        ]
        .unwrap();

        let terms = vec![
            IndexTerm {
                column: "a".to_string(),
                weight: 0.5,
                min: 0.0,
                max: 10.0,
                invert: false,
            },
            IndexTerm {
                column: "b".to_string(),
                weight: 0.5,
                min: 0.0,
                max: 10.0,
                invert: false,
            },
        ];

        FeatureEngineer::add_weighted_index(&mut df, "idx", &terms).unwrap();

        let idx = df.column("idx").unwrap().f64().unwrap();
        assert_eq!(idx.get(0).unwrap(), 0.5);
        assert_eq!(idx.get(1).unwrap(), 0.5);
    }

    #[test]
    fn test_engineer_drops_identifiers() {
        let schema = DatasetSchema {
            name: "test".to_string(),
            columns: vec![
                ColumnSpec::new("Id", ColumnRole::Identifier),
                ColumnSpec::new("x", ColumnRole::Numeric),
                ColumnSpec::new("y", ColumnRole::Target),
            ],
            derived: vec![],
            stratify_split: false,
            default_input: PathBuf::from("in.csv"),
            default_output: PathBuf::from("out.csv"),
        };

        let mut df = df![
            "Id" => [1i64, 2, 3],
            "x" => [1.0, 2.0, 3.0],
            "y" => [0.0, 1.0, 0.0],
        ]
        .unwrap();

        let mut steps = vec![];
        FeatureEngineer::engineer(&mut df, &schema, &mut steps).unwrap();

        assert!(df.column("Id").is_err());
        assert_eq!(df.width(), 2);
        assert!(steps.iter().any(|s| s.contains("Id")));
    }
}
