use polars::prelude::{DataFrame, DataType, StringChunked};

use crate::error::{Result, ValidateError};

/// Most offending values kept per issue.
pub(crate) const MAX_SAMPLES: usize = 5;

/// A column of `frame` as text, whatever its physical type.
pub(crate) fn text_values(frame: &DataFrame, table: &str, column: &str) -> Result<StringChunked> {
    let source = frame
        .column(column)
        .map_err(|_| ValidateError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        })?;
    let text = source.cast(&DataType::String)?;
    Ok(text.str()?.clone())
}

pub(crate) fn push_sample(samples: &mut Vec<String>, value: impl Into<String>) {
    if samples.len() < MAX_SAMPLES {
        samples.push(value.into());
    }
}
