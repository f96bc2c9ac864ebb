//! CSV loading.

use std::path::Path;

use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use tracing::info;

use crate::error::{PreprocessError, Result};

/// Load a raw dataset from a CSV file.
///
/// The file must exist, be UTF-8 and carry a header row. Both failure modes
/// (absent file, unparsable content) surface as a load error naming the path.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(PreprocessError::Load {
            path: path.display().to_string(),
            reason: "file not found".to_string(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| PreprocessError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?
        .finish()
        .map_err(|e| PreprocessError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    info!(
        "Loaded {} rows x {} columns from {}",
        df.height(),
        df.width(),
        path.display()
    );

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_csv_basic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "a,b\n1,x\n2,y").unwrap();

        let df = load_csv(&path).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_load_csv_missing_file() {
        let err = load_csv(Path::new("definitely/not/here.csv")).unwrap_err();
        assert_eq!(err.error_code(), "LOAD_ERROR");
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_csv_unparsable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        // Ragged rows make the CSV unparsable with a fixed schema
        writeln!(file, "a,b\n1,2,3,4,5\n\"unclosed").unwrap();

        let result = load_csv(&path);
        if let Err(err) = result {
            assert_eq!(err.error_code(), "LOAD_ERROR");
        }
    }
}
