//! The main preprocessing pipeline.
//!
//! `Pipeline` binds a dataset schema to a configuration and runs the fixed
//! stage order over a loaded table. It is stateless across invocations: two
//! runs on the same input with the same seed produce the same output, and
//! all fitted state (encoding maps, scaling parameters) is returned with the
//! result instead of being cached.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use polars::prelude::*;
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::{PreprocessError, Result};
use crate::pipeline::encoder::LabelEncoder;
use crate::pipeline::features::FeatureEngineer;
use crate::pipeline::imputer::StatisticalImputer;
use crate::pipeline::loader::load_csv;
use crate::pipeline::outliers::OutlierHandler;
use crate::pipeline::scaler::StandardScaler;
use crate::pipeline::splitter::TrainTestSplitter;
use crate::pipeline::writer::write_csv;
use crate::schema::DatasetSchema;
use crate::types::{PipelineResult, RunSummary};

/// The preprocessing pipeline for one dataset schema.
///
/// Use [`Pipeline::builder()`] to construct one.
///
/// # Example
///
/// ```rust,ignore
/// use dataprep::{DatasetSchema, Pipeline, PipelineConfig};
///
/// let result = Pipeline::builder()
///     .schema(DatasetSchema::wine_quality())
///     .config(PipelineConfig::default())
///     .build()?
///     .run("data/WineQT.csv".as_ref(), "out/WineQT_preprocessing.csv".as_ref())?;
///
/// println!("{} rows ready for training", result.data.height());
/// ```
#[derive(Debug)]
pub struct Pipeline {
    schema: DatasetSchema,
    config: PipelineConfig,
}

// The pipeline owns no interior state and can move across threads.
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every transform stage over an already-loaded table.
    ///
    /// Stage order is fixed: validate schema, drop duplicates, impute, handle
    /// outliers, engineer features, encode categoricals, order columns
    /// (target last), scale, split.
    pub fn process(&self, df: DataFrame) -> Result<PipelineResult> {
        let start_time = Instant::now();

        info!(
            "Starting preprocessing for '{}' ({} rows x {} columns)",
            self.schema.name,
            df.height(),
            df.width()
        );

        self.schema.validate_frame(&df)?;

        let mut summary = RunSummary::new(&self.schema.name);
        summary.rows_before = df.height();
        summary.columns_before = df.width();

        let mut processing_steps: Vec<String> = Vec::new();
        let mut df = df;

        // Step 1: duplicate removal
        if self.config.remove_duplicates {
            let rows_before = df.height();
            df = df.unique_stable(None, UniqueKeepStrategy::First, None)?;
            summary.duplicates_removed = rows_before - df.height();
            if summary.duplicates_removed > 0 {
                processing_steps.push(format!(
                    "Removed {} duplicate rows",
                    summary.duplicates_removed
                ));
                info!("Removed {} duplicate rows", summary.duplicates_removed);
            }
        }

        // Step 2: missing values
        info!("Step 2: Imputing missing values...");
        summary.cells_imputed =
            StatisticalImputer::impute(&mut df, &self.schema, &self.config, &mut processing_steps)?;

        // Step 3: outliers
        info!("Step 3: Handling outliers...");
        summary.outliers_capped =
            OutlierHandler::handle(&mut df, &self.schema, &self.config, &mut processing_steps)?;

        // Step 4: derived features, identifier drop
        info!("Step 4: Engineering features...");
        FeatureEngineer::engineer(&mut df, &self.schema, &mut processing_steps)?;

        // Step 5: label encoding (declared categoricals plus derived bands)
        info!("Step 5: Encoding categorical columns...");
        let mut categorical: Vec<String> = self
            .schema
            .categorical_columns()
            .into_iter()
            .map(str::to_string)
            .collect();
        categorical.extend(
            self.schema
                .derived
                .iter()
                .filter(|f| f.is_categorical())
                .map(|f| f.output().to_string()),
        );
        let encodings = LabelEncoder::encode_columns(&mut df, &categorical, &mut processing_steps)?;

        // Step 6: column order, target last
        let target = self.schema.target()?.to_string();
        let mut ordered: Vec<PlSmallStr> = df
            .get_column_names()
            .into_iter()
            .filter(|col| col.as_str() != target)
            .cloned()
            .collect();
        ordered.push(target.as_str().into());
        df = df.select(ordered)?;

        // Step 7: standardization of everything except the target
        info!("Step 7: Standardizing feature columns...");
        let feature_cols: Vec<String> = df
            .get_column_names()
            .iter()
            .filter(|col| col.as_str() != target)
            .map(|col| col.to_string())
            .collect();
        let scaling = StandardScaler::fit_transform(&mut df, &feature_cols, &mut processing_steps)?;

        // Step 8: optional split
        let (train, test) = match &self.config.split {
            Some(split_config) => {
                info!("Step 8: Splitting into train/test partitions...");
                let (train, test) = TrainTestSplitter::split(&df, &target, split_config)?;
                summary.train_rows = Some(train.height());
                summary.test_rows = Some(test.height());
                processing_steps.push(format!(
                    "Split into {} train / {} test rows (test size {}, seed {})",
                    train.height(),
                    test.height(),
                    split_config.test_size,
                    split_config.seed
                ));
                (Some(train), Some(test))
            }
            None => (None, None),
        };

        summary.rows_after = df.height();
        summary.columns_after = df.width();
        summary.duration_ms = start_time.elapsed().as_millis() as u64;
        summary.finished_at = Utc::now();

        info!(
            "Preprocessing complete: {} rows x {} columns in {} ms",
            summary.rows_after, summary.columns_after, summary.duration_ms
        );

        Ok(PipelineResult {
            data: df,
            train,
            test,
            encodings,
            scaling,
            processing_steps,
            summary,
        })
    }

    /// Load a CSV, process it, and write the output file(s).
    ///
    /// Nothing is written until every transform has succeeded, so a failed
    /// run never leaves a partial output behind. When splitting is enabled
    /// the partitions land next to the full output as `<stem>_train.csv` and
    /// `<stem>_test.csv`.
    pub fn run(&self, input: &Path, output: &Path) -> Result<PipelineResult> {
        let df = load_csv(input)?;
        let mut result = self.process(df)?;

        write_csv(&mut result.data, output)?;

        if let Some(train) = result.train.as_mut() {
            write_csv(train, &DatasetSchema::sibling_path(output, "train"))?;
        }
        if let Some(test) = result.test.as_mut() {
            write_csv(test, &DatasetSchema::sibling_path(output, "test"))?;
        }

        Ok(result)
    }
}

/// Builder for [`Pipeline`].
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    schema: Option<DatasetSchema>,
    config: Option<PipelineConfig>,
}

impl PipelineBuilder {
    /// Set the dataset schema (required).
    pub fn schema(mut self, schema: DatasetSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Set the pipeline configuration.
    ///
    /// When omitted, the default configuration is used with the split
    /// stratification taken from the schema.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the pipeline, validating schema and configuration.
    pub fn build(self) -> Result<Pipeline> {
        let schema = self.schema.ok_or_else(|| {
            PreprocessError::InvalidConfig("a dataset schema is required".to_string())
        })?;
        schema.validate_definition()?;

        let config = match self.config {
            Some(config) => config,
            None => {
                let mut config = PipelineConfig::default();
                if let Some(split) = config.split.as_mut() {
                    split.stratify = schema.stratify_split;
                }
                config
            }
        };
        config
            .validate()
            .map_err(|e| PreprocessError::InvalidConfig(e.to_string()))?;

        Ok(Pipeline { schema, config })
    }
}
