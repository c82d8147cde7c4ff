//! Error types for raw data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the raw visit export.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Failed to parse CSV.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file is empty (no header row).
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    /// A header cell is blank.
    #[error("CSV file {path} has an empty column name at position {position}")]
    EmptyColumnName { path: PathBuf, position: usize },

    /// The same column name appears twice in the header.
    #[error("CSV file {path} declares column '{column}' more than once")]
    DuplicateColumn { path: PathBuf, column: String },

    // === Schema Errors ===
    /// Input is missing columns declared by the raw manifest.
    #[error(
        "schema mismatch in {source_name} (manifest v{version}): missing {} column(s): {}",
        .missing.len(),
        .missing.join(", ")
    )]
    SchemaMismatch {
        source_name: String,
        version: u32,
        missing: Vec<String>,
    },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::FileNotFound {
            path: PathBuf::from("/data/legacy_healthcare_data.csv"),
        };
        assert_eq!(
            err.to_string(),
            "CSV file not found: /data/legacy_healthcare_data.csv"
        );
    }

    #[test]
    fn test_schema_mismatch_lists_columns() {
        let err = IngestError::SchemaMismatch {
            source_name: "visits.csv".to_string(),
            version: 1,
            missing: vec!["doctor_name".to_string(), "room_number".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "schema mismatch in visits.csv (manifest v1): missing 2 column(s): doctor_name, room_number"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
