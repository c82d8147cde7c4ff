//! The loaded raw visit export.

use polars::prelude::{DataFrame, DataType, StringChunked};

use hcn_common::non_blank;
use hcn_model::columns::{RAW_COLUMNS, raw_column_index};
use hcn_model::{MANIFEST_VERSION, RAW_TABLE, raw_manifest};

use crate::error::{IngestError, Result};

/// Immutable, fully materialized raw input for one pipeline run.
///
/// Holds the source frame plus one text view per manifest column, in
/// [`RAW_COLUMNS`] order, so row-wise stages can read cells without
/// re-resolving columns.
#[derive(Debug, Clone)]
pub struct RawDataset {
    frame: DataFrame,
    columns: Vec<StringChunked>,
    source_name: String,
}

impl RawDataset {
    /// Wraps a frame after checking it against the raw manifest.
    ///
    /// Every manifest column must be present; non-text columns are cast to text.
    /// Extra columns are kept in the frame but never read.
    pub fn from_frame(frame: DataFrame, source_name: impl Into<String>) -> Result<Self> {
        let source_name = source_name.into();
        let manifest = raw_manifest();
        let present: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let missing = manifest.missing_columns(present.iter().map(String::as_str));
        if !missing.is_empty() {
            return Err(IngestError::SchemaMismatch {
                source_name,
                version: MANIFEST_VERSION,
                missing,
            });
        }

        let mut columns = Vec::with_capacity(RAW_COLUMNS.len());
        for name in RAW_COLUMNS {
            let column = frame.column(name)?;
            let text = column.cast(&DataType::String)?;
            columns.push(text.str()?.clone());
        }

        Ok(Self {
            frame,
            columns,
            source_name,
        })
    }

    /// Number of raw records.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Name used for the input in diagnostics (usually the file path).
    pub fn source_name(&self) -> &str {
        if self.source_name.is_empty() {
            RAW_TABLE
        } else {
            &self.source_name
        }
    }

    /// Trimmed cell value; `None` for null, blank, or non-manifest columns.
    pub fn value(&self, column: &str, row: usize) -> Option<&str> {
        let index = raw_column_index(column)?;
        self.value_at(index, row)
    }

    /// Trimmed cell value by manifest position.
    pub fn value_at(&self, column_index: usize, row: usize) -> Option<&str> {
        let column = self.columns.get(column_index)?;
        if row >= column.len() {
            return None;
        }
        column.get(row).and_then(non_blank)
    }

    pub fn record(&self, row: usize) -> RawRecord<'_> {
        RawRecord { dataset: self, row }
    }

    pub fn records(&self) -> impl Iterator<Item = RawRecord<'_>> {
        (0..self.height()).map(move |row| self.record(row))
    }
}

/// Borrowed view of one raw row.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    dataset: &'a RawDataset,
    row: usize,
}

impl<'a> RawRecord<'a> {
    pub fn row(&self) -> usize {
        self.row
    }

    /// Trimmed value of a raw column, `None` when missing or blank.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.dataset.value(column, self.row)
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    use super::*;

    fn full_frame(rows: usize) -> DataFrame {
        let columns: Vec<Column> = RAW_COLUMNS
            .iter()
            .map(|name| {
                let values: Vec<Option<String>> =
                    (0..rows).map(|idx| Some(format!("{name}-{idx}"))).collect();
                Series::new((*name).into(), values).into_column()
            })
            .collect();
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn test_from_frame_reads_values() {
        let dataset = RawDataset::from_frame(full_frame(2), "inline").unwrap();
        assert_eq!(dataset.height(), 2);
        assert_eq!(dataset.value("doctor_name", 1), Some("doctor_name-1"));
        assert_eq!(dataset.record(0).get("visit_id"), Some("visit_id-0"));
        assert_eq!(dataset.value("doctor_name", 5), None);
        assert_eq!(dataset.value("not_a_column", 0), None);
    }

    #[test]
    fn test_from_frame_rejects_missing_columns() {
        let frame = full_frame(1).drop("room_number").unwrap();
        let err = RawDataset::from_frame(frame, "inline").unwrap_err();
        match err {
            IngestError::SchemaMismatch { missing, .. } => {
                assert_eq!(missing, vec!["room_number".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_cells_are_missing() {
        let mut frame = full_frame(1);
        frame
            .with_column(Series::new("clinic_name".into(), vec!["   "]))
            .unwrap();
        let dataset = RawDataset::from_frame(frame, "inline").unwrap();
        assert_eq!(dataset.value("clinic_name", 0), None);
    }

    #[test]
    fn test_numeric_columns_are_cast_to_text() {
        let mut frame = full_frame(1);
        frame
            .with_column(Series::new("patient_id".into(), vec![7i64]))
            .unwrap();
        let dataset = RawDataset::from_frame(frame, "inline").unwrap();
        assert_eq!(dataset.value("patient_id", 0), Some("7"));
    }
}
