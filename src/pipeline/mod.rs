//! Pipeline stages and orchestration.
//!
//! Stages run in a fixed order: load, drop duplicates, impute, cap outliers,
//! engineer features, encode, select columns, scale, split, save. Each stage
//! consumes the previous stage's table in full.

mod builder;
pub mod encoder;
pub mod features;
pub mod imputer;
pub mod loader;
pub mod outliers;
pub mod scaler;
pub mod splitter;
pub mod writer;

pub use builder::{Pipeline, PipelineBuilder};
pub use encoder::{EncodingMap, LabelEncoder};
pub use features::FeatureEngineer;
pub use imputer::StatisticalImputer;
pub use loader::load_csv;
pub use outliers::OutlierHandler;
pub use scaler::{ColumnScaling, StandardScaler};
pub use splitter::TrainTestSplitter;
pub use writer::write_csv;
