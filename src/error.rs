//! Error types for the preprocessing pipeline.
//!
//! One variant per failure class the pipeline can hit, built with `thiserror`.
//! Every stage fails fast and names the offending column or path; no partial
//! output is ever written.

use thiserror::Error;

/// The main error type for the preprocessing pipeline.
#[derive(Error, Debug)]
pub enum PreprocessError {
    /// Input file is absent or could not be parsed as CSV.
    #[error("Failed to load '{path}': {reason}")]
    Load { path: String, reason: String },

    /// A column required by the dataset schema is absent.
    #[error("Expected column '{column}' not found in dataset")]
    Schema { column: String },

    /// A column has zero (or non-finite) variance and cannot be standardized.
    #[error("Column '{column}' has zero variance, cannot standardize")]
    Scaling { column: String },

    /// Output file could not be written.
    #[error("Failed to write '{path}': {reason}")]
    Write { path: String, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No valid values found in a column for computation.
    #[error("No valid values found in column '{0}'")]
    NoValidValues(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PreprocessError>,
    },
}

impl PreprocessError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PreprocessError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, usable for exit-code mapping in the CLI.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load { .. } => "LOAD_ERROR",
            Self::Schema { .. } => "SCHEMA_ERROR",
            Self::Scaling { .. } => "SCALING_ERROR",
            Self::Write { .. } => "WRITE_ERROR",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::NoValidValues(_) => "NO_VALID_VALUES",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }
}

/// Result type alias for preprocessing operations.
pub type Result<T> = std::result::Result<T, PreprocessError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PreprocessError::Polars(e).with_context(context))
    }
}
