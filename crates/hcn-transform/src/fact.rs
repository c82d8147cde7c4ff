//! Fact assembly: one row per raw record, one foreign key per dimension.

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame};
use tracing::{debug, info};

use hcn_ingest::RawDataset;
use hcn_model::columns::{VISIT_DATE, VISIT_DATETIME, VISIT_ID, VISIT_TYPE};
use hcn_model::{Dimension, SurrogateKey};

use crate::datetime::normalize_visit_datetime;
use crate::dimension::DimensionTable;
use crate::error::{Result, TransformError};
use crate::frame::{surrogate_column, text_column};
use crate::keys::derive_keys;

/// The assembled `FactVisit` table.
#[derive(Debug, Clone)]
pub struct FactTable {
    pub frame: DataFrame,
    /// Fact rows whose foreign key is null, per dimension.
    pub null_foreign_keys: BTreeMap<Dimension, usize>,
}

impl FactTable {
    pub fn row_count(&self) -> usize {
        self.frame.height()
    }

    pub fn null_foreign_keys_for(&self, dimension: Dimension) -> usize {
        self.null_foreign_keys
            .get(&dimension)
            .copied()
            .unwrap_or_default()
    }
}

/// Assembles `FactVisit` from the raw dataset and the built dimensions.
///
/// Each foreign key comes from its own left join of the raw records against
/// one dimension's lookup, using the same key derivation the dimension was
/// built with. Records whose identity was excluded get a null key; no record
/// is ever dropped or duplicated.
///
/// # Errors
///
/// [`TransformError::MissingDimension`] when a dimension is absent from
/// `dimensions`, and [`TransformError::FactCardinality`] if the row count
/// differs from the raw input.
pub fn assemble_fact(
    raw: &RawDataset,
    dimensions: &BTreeMap<Dimension, DimensionTable>,
) -> Result<FactTable> {
    let raw_rows = raw.height();
    let mut columns: Vec<Column> = Vec::with_capacity(Dimension::ALL.len() + 3);
    let mut null_foreign_keys = BTreeMap::new();

    for dimension in Dimension::ALL {
        let table = dimensions
            .get(&dimension)
            .ok_or(TransformError::MissingDimension(dimension))?;
        let (column, nulls) = resolve_foreign_keys(raw, table);
        if column.len() != raw_rows {
            return Err(TransformError::FactCardinality {
                raw_rows,
                fact_rows: column.len(),
            });
        }
        debug!(
            dimension = %dimension,
            null_foreign_keys = nulls,
            "foreign keys resolved"
        );
        null_foreign_keys.insert(dimension, nulls);
        columns.push(column);
    }

    columns.push(text_column(VISIT_ID, raw_texts(raw, VISIT_ID)));
    columns.push(text_column(
        VISIT_DATE,
        raw.records()
            .map(|record| record.get(VISIT_DATETIME).and_then(normalize_visit_datetime))
            .collect(),
    ));
    columns.push(text_column(VISIT_TYPE, raw_texts(raw, VISIT_TYPE)));

    let frame = DataFrame::new(columns)?;
    if frame.height() != raw_rows {
        return Err(TransformError::FactCardinality {
            raw_rows,
            fact_rows: frame.height(),
        });
    }
    info!(rows = frame.height(), "fact table assembled");

    Ok(FactTable {
        frame,
        null_foreign_keys,
    })
}

fn resolve_foreign_keys(raw: &RawDataset, table: &DimensionTable) -> (Column, usize) {
    let dimension = table.dimension;
    let keys = derive_keys(dimension, raw);
    let resolved: Vec<Option<&SurrogateKey>> = keys
        .iter()
        .map(|key| key.as_ref().and_then(|key| table.lookup.get(key)))
        .collect();
    let nulls = resolved.iter().filter(|key| key.is_none()).count();
    let column = surrogate_column(dimension, dimension.surrogate_column(), &resolved);
    (column, nulls)
}

fn raw_texts(raw: &RawDataset, column: &str) -> Vec<Option<String>> {
    raw.records()
        .map(|record| record.get(column).map(str::to_string))
        .collect()
}
