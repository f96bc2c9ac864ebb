//! Tabular Dataset Preprocessing Pipeline
//!
//! A deterministic CSV-to-CSV preprocessing library built with Rust and Polars,
//! turning raw tabular datasets into model-ready tables.
//!
//! # Overview
//!
//! The pipeline runs a fixed sequence of transforms over a dataset described
//! by an explicit [`DatasetSchema`]:
//!
//! - **Cleaning**: duplicate row removal, statistical imputation of missing
//!   values, IQR-based outlier capping or removal
//! - **Feature Engineering**: threshold bands and weighted composite indices
//!   derived from existing columns
//! - **Encoding**: sorted-order label encoding of categorical columns
//! - **Scaling**: standardization of every feature column to mean 0, std 1
//! - **Splitting**: optional seeded (and optionally stratified) train/test
//!   partitioning
//!
//! Identical input, configuration, and seed always produce identical output.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use dataprep::{DatasetSchema, Pipeline};
//!
//! let result = Pipeline::builder()
//!     .schema(DatasetSchema::wine_quality())
//!     .build()?
//!     .run(
//!         "data/WineQT.csv".as_ref(),
//!         "preprocessing/WineQT_preprocessing.csv".as_ref(),
//!     )?;
//!
//! println!("Preprocessing complete!");
//! println!("Rows: {} -> {}", result.summary.rows_before, result.summary.rows_after);
//! for step in &result.processing_steps {
//!     println!("  - {step}");
//! }
//! ```
//!
//! # Configuration
//!
//! Use [`PipelineConfig`] to customize the transform strategies:
//!
//! ```rust,ignore
//! use dataprep::{OutlierStrategy, NumericImputation, PipelineConfig, SplitConfig};
//!
//! let config = PipelineConfig::builder()
//!     .outlier_strategy(OutlierStrategy::Remove)
//!     .numeric_imputation(NumericImputation::Mean)
//!     .split(Some(SplitConfig { test_size: 0.25, seed: 7, stratify: true }))
//!     .build()?;
//! ```
//!
//! # Schemas
//!
//! Two dataset schemas ship with the crate: [`DatasetSchema::wine_quality`]
//! for the WineQT dataset and [`DatasetSchema::climate_agriculture`] for the
//! climate impact on agriculture dataset. Custom schemas can be assembled
//! from [`ColumnSpec`] and [`DerivedFeature`] values directly.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod schema;
pub mod stats;
pub mod types;

// Re-exports for convenient access
pub use config::{
    CategoricalImputation, ConfigValidationError, NumericImputation, OutlierStrategy,
    PipelineConfig, PipelineConfigBuilder, SplitConfig,
};
pub use error::{PreprocessError, Result, ResultExt};
pub use pipeline::{
    ColumnScaling, EncodingMap, FeatureEngineer, LabelEncoder, OutlierHandler, Pipeline,
    PipelineBuilder, StandardScaler, StatisticalImputer, TrainTestSplitter, load_csv, write_csv,
};
pub use schema::{ColumnRole, ColumnSpec, DatasetSchema, DerivedFeature, IndexTerm};
pub use types::{PipelineResult, RunSummary};
