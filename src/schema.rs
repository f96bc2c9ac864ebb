//! Explicit dataset schemas.
//!
//! Instead of inferring column roles at runtime, every supported dataset
//! declares its columns, their roles and its derived features up front. The
//! pipeline validates an incoming table against the schema and fails with a
//! schema error before any transform runs.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{PreprocessError, Result};

/// Role of a column within a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnRole {
    /// Row identifier; excluded from outlier handling and dropped before output.
    Identifier,
    /// Numeric feature; imputed with median/mean, capped, scaled.
    Numeric,
    /// Categorical feature; imputed with mode/constant, label-encoded, scaled.
    Categorical,
    /// Prediction target; imputed but never capped or scaled.
    Target,
}

/// A single declared column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub role: ColumnRole,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, role: ColumnRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// One normalized term of a weighted index feature.
///
/// The source value is min-max normalized against the fixed `[min, max]`
/// range, clamped to [0, 1], optionally inverted, then multiplied by `weight`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexTerm {
    pub column: String,
    pub weight: f64,
    pub min: f64,
    pub max: f64,
    pub invert: bool,
}

/// A derived column computed row-locally from already-cleaned columns.
///
/// Formulas and thresholds are fixed constants declared on the schema, so the
/// same derivation applies identically to every row of every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DerivedFeature {
    /// Bucket a continuous column into ordered labels using ascending
    /// thresholds. `labels` must hold exactly one more entry than
    /// `thresholds`: a value below the first threshold gets the first label,
    /// a value at or above the last threshold gets the last one.
    Band {
        source: String,
        output: String,
        thresholds: Vec<f64>,
        labels: Vec<String>,
    },
    /// Weighted sum of min-max-normalized terms.
    WeightedIndex { output: String, terms: Vec<IndexTerm> },
}

impl DerivedFeature {
    /// Name of the column this feature produces.
    pub fn output(&self) -> &str {
        match self {
            Self::Band { output, .. } => output,
            Self::WeightedIndex { output, .. } => output,
        }
    }

    /// Whether the produced column is categorical (and thus gets encoded).
    pub fn is_categorical(&self) -> bool {
        matches!(self, Self::Band { .. })
    }

    /// Columns this feature reads.
    pub fn sources(&self) -> Vec<&str> {
        match self {
            Self::Band { source, .. } => vec![source.as_str()],
            Self::WeightedIndex { terms, .. } => {
                terms.iter().map(|t| t.column.as_str()).collect()
            }
        }
    }
}

/// Declared schema of a supported dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSchema {
    /// Short dataset name used in logs and summaries.
    pub name: String,
    /// Expected columns of the raw CSV, with roles.
    pub columns: Vec<ColumnSpec>,
    /// Derived features computed after cleaning.
    pub derived: Vec<DerivedFeature>,
    /// Whether the train/test split should be stratified by the target.
    pub stratify_split: bool,
    /// Default input path for the CLI.
    pub default_input: PathBuf,
    /// Default output path for the CLI.
    pub default_output: PathBuf,
}

impl DatasetSchema {
    /// The declared target column.
    pub fn target(&self) -> Result<&str> {
        self.columns
            .iter()
            .find(|c| c.role == ColumnRole::Target)
            .map(|c| c.name.as_str())
            .ok_or_else(|| {
                PreprocessError::InvalidConfig(format!(
                    "schema '{}' declares no target column",
                    self.name
                ))
            })
    }

    /// Names of identifier columns.
    pub fn identifier_columns(&self) -> Vec<&str> {
        self.columns_with_role(ColumnRole::Identifier)
    }

    /// Names of numeric feature columns (identifiers and target excluded).
    pub fn numeric_feature_columns(&self) -> Vec<&str> {
        self.columns_with_role(ColumnRole::Numeric)
    }

    /// Names of declared categorical columns.
    pub fn categorical_columns(&self) -> Vec<&str> {
        self.columns_with_role(ColumnRole::Categorical)
    }

    fn columns_with_role(&self, role: ColumnRole) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.role == role)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Validate the schema definition itself.
    pub fn validate_definition(&self) -> Result<()> {
        let target_count = self
            .columns
            .iter()
            .filter(|c| c.role == ColumnRole::Target)
            .count();
        if target_count != 1 {
            return Err(PreprocessError::InvalidConfig(format!(
                "schema '{}' must declare exactly one target column, found {}",
                self.name, target_count
            )));
        }

        let declared: Vec<&str> = self.columns.iter().map(|c| c.name.as_str()).collect();
        for feature in &self.derived {
            for source in feature.sources() {
                if !declared.contains(&source) {
                    return Err(PreprocessError::InvalidConfig(format!(
                        "derived feature '{}' reads undeclared column '{}'",
                        feature.output(),
                        source
                    )));
                }
            }
            match feature {
                DerivedFeature::Band {
                    output,
                    thresholds,
                    labels,
                    ..
                } => {
                    if labels.len() != thresholds.len() + 1 {
                        return Err(PreprocessError::InvalidConfig(format!(
                            "band feature '{}' needs {} labels for {} thresholds, found {}",
                            output,
                            thresholds.len() + 1,
                            thresholds.len(),
                            labels.len()
                        )));
                    }
                    if thresholds.windows(2).any(|w| w[0] >= w[1]) {
                        return Err(PreprocessError::InvalidConfig(format!(
                            "band feature '{}' thresholds must be strictly ascending",
                            output
                        )));
                    }
                }
                DerivedFeature::WeightedIndex { output, terms } => {
                    if terms.is_empty() {
                        return Err(PreprocessError::InvalidConfig(format!(
                            "index feature '{}' declares no terms",
                            output
                        )));
                    }
                    for term in terms {
                        if term.max <= term.min {
                            return Err(PreprocessError::InvalidConfig(format!(
                                "index feature '{}' term '{}' has an empty range",
                                output, term.column
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Validate an incoming table against this schema.
    ///
    /// Every declared column must be present; extra columns are rejected up
    /// front rather than silently carried along.
    pub fn validate_frame(&self, df: &DataFrame) -> Result<()> {
        self.validate_definition()?;

        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        for column in &self.columns {
            if !present.contains(&column.name) {
                return Err(PreprocessError::Schema {
                    column: column.name.clone(),
                });
            }
        }

        for name in &present {
            if !self.columns.iter().any(|c| &c.name == name) {
                return Err(PreprocessError::InvalidConfig(format!(
                    "dataset contains undeclared column '{}'",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Built-in schema for the WineQT wine-quality dataset.
    ///
    /// All physico-chemical measurements are numeric features, `Id` is a row
    /// identifier and `quality` the target. One derived band over `alcohol`
    /// exercises the categorical path on an otherwise all-numeric table.
    pub fn wine_quality() -> Self {
        let numeric = [
            "fixed acidity",
            "volatile acidity",
            "citric acid",
            "residual sugar",
            "chlorides",
            "free sulfur dioxide",
            "total sulfur dioxide",
            "density",
            "pH",
            "sulphates",
            "alcohol",
        ];

        let mut columns: Vec<ColumnSpec> = numeric
            .iter()
            .map(|name| ColumnSpec::new(*name, ColumnRole::Numeric))
            .collect();
        columns.push(ColumnSpec::new("quality", ColumnRole::Target));
        columns.push(ColumnSpec::new("Id", ColumnRole::Identifier));

        Self {
            name: "wine_quality".to_string(),
            columns,
            derived: vec![DerivedFeature::Band {
                source: "alcohol".to_string(),
                output: "alcohol band".to_string(),
                thresholds: vec![9.5, 11.0, 12.5],
                labels: vec![
                    "Low".to_string(),
                    "Medium".to_string(),
                    "High".to_string(),
                    "VeryHigh".to_string(),
                ],
            }],
            stratify_split: true,
            default_input: PathBuf::from("data/WineQT.csv"),
            default_output: PathBuf::from("preprocessing/WineQT_preprocessing.csv"),
        }
    }

    /// Built-in schema for the climate/agriculture impact dataset.
    pub fn climate_agriculture() -> Self {
        let numeric = [
            "Average_Temperature_C",
            "Total_Precipitation_mm",
            "CO2_Emissions_MT",
            "Extreme_Weather_Events",
            "Irrigation_Access_Pct",
            "Pesticide_Use_KG_per_HA",
            "Fertilizer_Use_KG_per_HA",
            "Soil_Health_Index",
        ];

        let mut columns = vec![
            ColumnSpec::new("Country", ColumnRole::Categorical),
            ColumnSpec::new("Crop_Type", ColumnRole::Categorical),
            ColumnSpec::new("Adaptation_Strategies", ColumnRole::Categorical),
        ];
        columns.extend(
            numeric
                .iter()
                .map(|name| ColumnSpec::new(*name, ColumnRole::Numeric)),
        );
        columns.push(ColumnSpec::new("Crop_Yield_MT_per_HA", ColumnRole::Target));

        Self {
            name: "climate_agriculture".to_string(),
            columns,
            derived: vec![
                DerivedFeature::Band {
                    source: "Average_Temperature_C".to_string(),
                    output: "Temperature_Band".to_string(),
                    thresholds: vec![10.0, 20.0, 30.0],
                    labels: vec![
                        "Cool".to_string(),
                        "Mild".to_string(),
                        "Warm".to_string(),
                        "Hot".to_string(),
                    ],
                },
                DerivedFeature::WeightedIndex {
                    output: "Climate_Stress_Index".to_string(),
                    terms: vec![
                        IndexTerm {
                            column: "Average_Temperature_C".to_string(),
                            weight: 0.5,
                            min: -5.0,
                            max: 45.0,
                            invert: false,
                        },
                        IndexTerm {
                            column: "Total_Precipitation_mm".to_string(),
                            weight: 0.3,
                            min: 0.0,
                            max: 3000.0,
                            invert: true,
                        },
                        IndexTerm {
                            column: "Extreme_Weather_Events".to_string(),
                            weight: 0.2,
                            min: 0.0,
                            max: 15.0,
                            invert: false,
                        },
                    ],
                },
                DerivedFeature::WeightedIndex {
                    output: "Water_Availability_Index".to_string(),
                    terms: vec![
                        IndexTerm {
                            column: "Total_Precipitation_mm".to_string(),
                            weight: 0.6,
                            min: 0.0,
                            max: 3000.0,
                            invert: false,
                        },
                        IndexTerm {
                            column: "Irrigation_Access_Pct".to_string(),
                            weight: 0.4,
                            min: 0.0,
                            max: 100.0,
                            invert: false,
                        },
                    ],
                },
            ],
            stratify_split: false,
            default_input: PathBuf::from("data/climate_agriculture.csv"),
            default_output: PathBuf::from("preprocessing/climate_agriculture_preprocessing.csv"),
        }
    }

    /// Derive the train-partition path from an output path
    /// (`out.csv` → `out_train.csv`).
    pub fn sibling_path(output: &Path, suffix: &str) -> PathBuf {
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        let ext = output
            .extension()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "csv".to_string());
        output.with_file_name(format!("{}_{}.{}", stem, suffix, ext))
    }
}
