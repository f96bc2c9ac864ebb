//! Configuration types for the preprocessing pipeline.
//!
//! Builder-pattern configuration with validation. All thresholds and
//! strategies are explicit; nothing is picked up from the environment.

use serde::{Deserialize, Serialize};

/// Strategy for handling outliers in numeric feature columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutlierStrategy {
    /// Cap outliers at IQR bounds (Q1 - k*IQR, Q3 + k*IQR); row count unchanged
    #[default]
    Cap,
    /// Remove rows containing outliers
    Remove,
    /// Keep outliers as-is (no handling)
    Keep,
}

/// Strategy for imputing missing numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NumericImputation {
    /// Use the median of non-null values
    #[default]
    Median,
    /// Use the mean of non-null values
    Mean,
}

/// Strategy for imputing missing categorical values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CategoricalImputation {
    /// Use the most frequent value (mode)
    #[default]
    Mode,
    /// Use a constant value ("Unknown")
    Constant,
}

/// Train/test split settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of rows assigned to the test partition (0.0 - 1.0, exclusive).
    pub test_size: f64,
    /// Seed for the shuffle; identical seed and input give identical partitions.
    pub seed: u64,
    /// Stratify the split by the target column.
    pub stratify: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            seed: 42,
            stratify: false,
        }
    }
}

/// Configuration for the preprocessing pipeline.
///
/// Use [`PipelineConfig::builder()`] to create a new configuration
/// with a fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use dataprep::{OutlierStrategy, PipelineConfig};
///
/// let config = PipelineConfig::builder()
///     .outlier_strategy(OutlierStrategy::Cap)
///     .split(Some(SplitConfig { test_size: 0.2, seed: 42, stratify: true }))
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Strategy for handling outliers.
    /// Default: Cap
    pub outlier_strategy: OutlierStrategy,

    /// Multiplier applied to the IQR when computing outlier bounds.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Strategy for imputing missing numeric values.
    /// Default: Median
    pub numeric_imputation: NumericImputation,

    /// Strategy for imputing missing categorical values.
    /// Default: Mode
    pub categorical_imputation: CategoricalImputation,

    /// Whether to drop duplicate rows before imputation.
    /// Default: true
    pub remove_duplicates: bool,

    /// Train/test split settings; `None` disables splitting.
    /// Default: Some(SplitConfig::default())
    pub split: Option<SplitConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            outlier_strategy: OutlierStrategy::default(),
            iqr_multiplier: 1.5,
            numeric_imputation: NumericImputation::default(),
            categorical_imputation: CategoricalImputation::default(),
            remove_duplicates: true,
            split: Some(SplitConfig::default()),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.iqr_multiplier <= 0.0 || !self.iqr_multiplier.is_finite() {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        if let Some(split) = &self.split
            && !(split.test_size > 0.0 && split.test_size < 1.0)
        {
            return Err(ConfigValidationError::InvalidTestSize(split.test_size));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid IQR multiplier: {0} (must be positive and finite)")]
    InvalidIqrMultiplier(f64),

    #[error("Invalid test size: {0} (must be strictly between 0.0 and 1.0)")]
    InvalidTestSize(f64),
}

/// Builder for [`PipelineConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    outlier_strategy: Option<OutlierStrategy>,
    iqr_multiplier: Option<f64>,
    numeric_imputation: Option<NumericImputation>,
    categorical_imputation: Option<CategoricalImputation>,
    remove_duplicates: Option<bool>,
    split: Option<Option<SplitConfig>>,
}

impl PipelineConfigBuilder {
    /// Set the strategy for handling outliers.
    pub fn outlier_strategy(mut self, strategy: OutlierStrategy) -> Self {
        self.outlier_strategy = Some(strategy);
        self
    }

    /// Set the IQR multiplier used for outlier bounds.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Set the numeric imputation strategy.
    pub fn numeric_imputation(mut self, strategy: NumericImputation) -> Self {
        self.numeric_imputation = Some(strategy);
        self
    }

    /// Set the categorical imputation strategy.
    pub fn categorical_imputation(mut self, strategy: CategoricalImputation) -> Self {
        self.categorical_imputation = Some(strategy);
        self
    }

    /// Enable or disable duplicate row removal.
    pub fn remove_duplicates(mut self, remove: bool) -> Self {
        self.remove_duplicates = Some(remove);
        self
    }

    /// Set the split configuration; `None` disables splitting.
    pub fn split(mut self, split: Option<SplitConfig>) -> Self {
        self.split = Some(split);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PipelineConfig` or an error if validation fails.
    pub fn build(self) -> Result<PipelineConfig, ConfigValidationError> {
        let config = PipelineConfig {
            outlier_strategy: self.outlier_strategy.unwrap_or_default(),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(1.5),
            numeric_imputation: self.numeric_imputation.unwrap_or_default(),
            categorical_imputation: self.categorical_imputation.unwrap_or_default(),
            remove_duplicates: self.remove_duplicates.unwrap_or(true),
            split: self.split.unwrap_or_else(|| Some(SplitConfig::default())),
        };

        config.validate()?;
        Ok(config)
    }
}
