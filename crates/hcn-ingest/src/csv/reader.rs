//! CSV file reading into a text-only Polars DataFrame.

use std::path::Path;

use polars::prelude::*;

use crate::error::{IngestError, Result};

use super::header::CsvHeaders;

/// Reads a CSV file into a DataFrame where every column is text.
///
/// Type inference is disabled so identifiers such as zip codes or ids with
/// leading zeros survive unchanged. Column names are replaced by the
/// normalized `headers`.
pub fn read_csv_frame(path: &Path, headers: &CsvHeaders) -> Result<DataFrame> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() != headers.len() {
        return Err(IngestError::CsvParse {
            path: path.to_path_buf(),
            message: format!(
                "header declares {} columns but {} were parsed",
                headers.len(),
                df.width()
            ),
        });
    }
    df.set_column_names(headers.columns.iter().map(String::as_str))?;

    Ok(df)
}
