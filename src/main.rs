//! CLI entry point for the dataset preprocessing pipeline.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dataprep::{
    CategoricalImputation, DatasetSchema, NumericImputation, OutlierStrategy, Pipeline,
    PipelineConfig, SplitConfig,
};
use tracing::info;

/// Dataset selector mapping to a built-in schema.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliDataset {
    /// WineQT red wine quality dataset
    Wine,
    /// Climate impact on agriculture dataset
    Climate,
}

impl CliDataset {
    fn schema(self) -> DatasetSchema {
        match self {
            CliDataset::Wine => DatasetSchema::wine_quality(),
            CliDataset::Climate => DatasetSchema::climate_agriculture(),
        }
    }
}

/// CLI-compatible outlier strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutlierStrategy {
    /// Cap outliers at IQR bounds
    Cap,
    /// Remove rows containing outliers
    Remove,
    /// Keep outliers as-is
    Keep,
}

impl From<CliOutlierStrategy> for OutlierStrategy {
    fn from(cli: CliOutlierStrategy) -> Self {
        match cli {
            CliOutlierStrategy::Cap => OutlierStrategy::Cap,
            CliOutlierStrategy::Remove => OutlierStrategy::Remove,
            CliOutlierStrategy::Keep => OutlierStrategy::Keep,
        }
    }
}

/// CLI-compatible numeric imputation strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliNumericImputation {
    /// Use the median of non-null values
    Median,
    /// Use the mean of non-null values
    Mean,
}

impl From<CliNumericImputation> for NumericImputation {
    fn from(cli: CliNumericImputation) -> Self {
        match cli {
            CliNumericImputation::Median => NumericImputation::Median,
            CliNumericImputation::Mean => NumericImputation::Mean,
        }
    }
}

/// CLI-compatible categorical imputation strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliCategoricalImputation {
    /// Use the most frequent value (mode)
    Mode,
    /// Use a constant value ("Unknown")
    Constant,
}

impl From<CliCategoricalImputation> for CategoricalImputation {
    fn from(cli: CliCategoricalImputation) -> Self {
        match cli {
            CliCategoricalImputation::Mode => CategoricalImputation::Mode,
            CliCategoricalImputation::Constant => CategoricalImputation::Constant,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "automate",
    version,
    about = "Deterministic dataset preprocessing for machine learning",
    long_about = "Cleans, encodes, scales, and splits a tabular dataset.\n\n\
                  EXAMPLES:\n  \
                  # Preprocess the wine quality dataset with defaults\n  \
                  automate --dataset wine\n\n  \
                  # Custom paths and no train/test split\n  \
                  automate raw.csv out/clean.csv --dataset climate --no-split\n\n  \
                  # Machine-readable run summary\n  \
                  automate --dataset wine --json | jq .rows_after"
)]
struct Args {
    /// Path to the input CSV file (defaults to the dataset's standard location)
    input: Option<PathBuf>,

    /// Path for the output CSV file (train/test partitions land beside it)
    output: Option<PathBuf>,

    /// Which built-in dataset schema to use
    #[arg(short, long, value_enum, default_value = "wine")]
    dataset: CliDataset,

    /// Strategy for handling outliers
    #[arg(long, value_enum, default_value = "cap")]
    outlier_strategy: CliOutlierStrategy,

    /// Multiplier applied to the IQR when computing outlier bounds
    #[arg(long, default_value = "1.5")]
    iqr_multiplier: f64,

    /// Strategy for imputing missing numeric values
    #[arg(long, value_enum, default_value = "median")]
    numeric_imputation: CliNumericImputation,

    /// Strategy for imputing missing categorical values
    #[arg(long, value_enum, default_value = "mode")]
    categorical_imputation: CliCategoricalImputation,

    /// Keep duplicate rows instead of dropping them
    #[arg(long)]
    keep_duplicates: bool,

    /// Skip the train/test split; write only the full output file
    #[arg(long)]
    no_split: bool,

    /// Fraction of rows assigned to the test partition (0.0 - 1.0, exclusive)
    #[arg(long, default_value = "0.2")]
    test_size: f64,

    /// Seed for the split shuffle
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,

    /// Output the run summary as JSON to stdout
    ///
    /// Disables all progress logs; only the final JSON summary is written.
    /// Useful for piping to other tools: `automate --json | jq .duration_ms`
    #[arg(long)]
    json: bool,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled so stdout
/// carries only the JSON summary.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let schema = args.dataset.schema();

    let input = args
        .input
        .clone()
        .unwrap_or_else(|| schema.default_input.clone());
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| schema.default_output.clone());

    let split = if args.no_split {
        None
    } else {
        Some(SplitConfig {
            test_size: args.test_size,
            seed: args.seed,
            stratify: schema.stratify_split,
        })
    };

    let config = PipelineConfig::builder()
        .outlier_strategy(args.outlier_strategy.into())
        .iqr_multiplier(args.iqr_multiplier)
        .numeric_imputation(args.numeric_imputation.into())
        .categorical_imputation(args.categorical_imputation.into())
        .remove_duplicates(!args.keep_duplicates)
        .split(split)
        .build()
        .context("invalid configuration")?;

    let pipeline = Pipeline::builder()
        .schema(schema)
        .config(config)
        .build()
        .context("failed to build pipeline")?;

    info!("Processing {} -> {}", input.display(), output.display());

    let result = pipeline
        .run(&input, &output)
        .with_context(|| format!("preprocessing failed for {}", input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.summary)?);
    } else {
        info!("Done in {} ms:", result.summary.duration_ms);
        for step in &result.processing_steps {
            info!("  - {step}");
        }
    }

    Ok(())
}
