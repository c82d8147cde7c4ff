//! Error types for the join validator.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that prevent validation from running at all.
///
/// Findings about the data are never errors; they are reported as
/// [`hcn_model::ValidationIssue`]s.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// A table handed to the validator lacks a column the checks need.
    #[error("table {table} has no column {column}")]
    MissingColumn { table: String, column: String },

    /// Error from Polars DataFrame operations.
    #[error("dataframe error: {message}")]
    DataFrame { message: String },
}

impl From<PolarsError> for ValidateError {
    fn from(err: PolarsError) -> Self {
        ValidateError::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for validation operations.
pub type Result<T> = std::result::Result<T, ValidateError>;
