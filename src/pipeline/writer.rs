//! CSV output.

use std::fs;
use std::fs::File;
use std::path::Path;

use polars::prelude::*;
use tracing::info;

use crate::error::{PreprocessError, Result};

/// Write a table to CSV, creating parent directories as needed.
///
/// Output is comma-separated UTF-8 with a header row. Any path or permission
/// failure surfaces as a write error naming the path.
pub fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| PreprocessError::Write {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
    }

    let mut file = File::create(path).map_err(|e| PreprocessError::Write {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(df)
        .map_err(|e| PreprocessError::Write {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    info!(
        "Wrote {} rows x {} columns to {}",
        df.height(),
        df.width(),
        path.display()
    );

    Ok(())
}
