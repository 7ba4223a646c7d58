use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while loading a sales source.
///
/// Unparseable dates are never an error; they load as null.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The source file could not be opened.
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not map to a known format.
    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    /// One or more required columns are absent from the source.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A column exists but holds a type that cannot represent its values.
    #[error("Column '{column}' has unsupported type {found}")]
    ColumnType { column: String, found: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_open() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = LoadError::Open {
            path: PathBuf::from("/data/sales.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to open"));
        assert!(msg.contains("/data/sales.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_missing_columns() {
        let err = LoadError::MissingColumns(vec!["Order Date".into(), "Sales".into()]);
        assert_eq!(err.to_string(), "Missing required columns: Order Date, Sales");
    }

    #[test]
    fn test_error_display_unsupported_format() {
        let err = LoadError::UnsupportedFormat("xlsx".into());
        assert_eq!(err.to_string(), "Unsupported file extension: .xlsx");
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: LoadError = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
