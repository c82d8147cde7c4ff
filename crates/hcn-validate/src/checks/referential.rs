//! Per-dimension referential coverage and round-trip checks.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use polars::prelude::DataFrame;

use hcn_common::non_blank;
use hcn_ingest::RawDataset;
use hcn_model::{Dimension, DimensionCoverage, FACT_TABLE, IssueKind, ValidationIssue};

use crate::error::Result;
use crate::util::{push_sample, text_values};

/// Coverage and issues for one fact foreign-key column.
#[derive(Debug)]
pub(crate) struct ReferentialResult {
    pub coverage: DimensionCoverage,
    pub issues: Vec<ValidationIssue>,
}

/// Checks one foreign-key column of the fact table against its dimension.
///
/// Null keys are expected (excluded identities) and only counted. The
/// dimension's surrogate keys must be unique, and non-null fact keys must
/// exist in the dimension. With the raw dataset at hand, each
/// referenced dimension row's identity columns must also equal the raw
/// record the fact row was built from.
pub(crate) fn check_dimension(
    dimension: Dimension,
    fact: &DataFrame,
    table: &DataFrame,
    raw: Option<&RawDataset>,
) -> Result<ReferentialResult> {
    let key_column = dimension.surrogate_column();
    let table_name = dimension.table_name();
    let fact_keys = text_values(fact, FACT_TABLE, key_column)?;
    let dimension_keys = text_values(table, table_name, key_column)?;

    let mut rows_by_key: HashMap<&str, usize> = HashMap::with_capacity(dimension_keys.len());
    let mut duplicate_rows = 0usize;
    let mut duplicate_samples = Vec::new();
    for (idx, value) in dimension_keys.into_iter().enumerate() {
        let Some(key) = value.and_then(non_blank) else {
            continue;
        };
        if let Entry::Vacant(entry) = rows_by_key.entry(key) {
            entry.insert(idx);
        } else {
            duplicate_rows += 1;
            if !duplicate_samples.iter().any(|sample: &String| sample == key) {
                push_sample(&mut duplicate_samples, key);
            }
        }
    }

    let identity = dimension
        .identity_columns()
        .iter()
        .map(|column| text_values(table, table_name, column).map(|values| (*column, values)))
        .collect::<Result<Vec<_>>>()?;
    let raw = raw.filter(|raw| raw.height() == fact.height());

    let mut coverage = DimensionCoverage {
        dimension,
        fact_rows: fact.height(),
        null_foreign_keys: 0,
        orphan_foreign_keys: 0,
        duplicate_dimension_keys: duplicate_rows,
        checked_rows: 0,
        mismatched_rows: 0,
    };
    let mut orphan_samples = Vec::new();
    let mut mismatch_samples = Vec::new();

    for (row, value) in fact_keys.into_iter().enumerate() {
        let Some(key) = value.and_then(non_blank) else {
            coverage.null_foreign_keys += 1;
            continue;
        };
        let Some(&target) = rows_by_key.get(key) else {
            coverage.orphan_foreign_keys += 1;
            push_sample(&mut orphan_samples, key);
            continue;
        };
        let Some(raw) = raw else {
            continue;
        };
        coverage.checked_rows += 1;
        let matches = identity.iter().all(|(column, values)| {
            values.get(target).and_then(non_blank) == raw.value(column, row)
        });
        if !matches {
            coverage.mismatched_rows += 1;
            push_sample(&mut mismatch_samples, format!("row {row} -> {key}"));
        }
    }

    let mut issues = Vec::new();
    if coverage.duplicate_dimension_keys > 0 {
        issues.push(
            ValidationIssue::new(
                IssueKind::DuplicateDimensionKey,
                table_name,
                format!(
                    "{} {} rows repeat a surrogate key of an earlier row",
                    coverage.duplicate_dimension_keys, table_name
                ),
            )
            .with_column(key_column)
            .with_count(coverage.duplicate_dimension_keys as u64)
            .with_samples(duplicate_samples),
        );
    }
    if coverage.null_foreign_keys > 0 {
        issues.push(
            ValidationIssue::new(
                IssueKind::NullForeignKey,
                FACT_TABLE,
                format!(
                    "{} fact rows have no {} reference (missing identity in the source)",
                    coverage.null_foreign_keys, table_name
                ),
            )
            .with_column(key_column)
            .with_count(coverage.null_foreign_keys as u64),
        );
    }
    if coverage.orphan_foreign_keys > 0 {
        issues.push(
            ValidationIssue::new(
                IssueKind::OrphanForeignKey,
                FACT_TABLE,
                format!(
                    "{} fact rows reference {} keys that do not exist",
                    coverage.orphan_foreign_keys, table_name
                ),
            )
            .with_column(key_column)
            .with_count(coverage.orphan_foreign_keys as u64)
            .with_samples(orphan_samples),
        );
    }
    if coverage.mismatched_rows > 0 {
        issues.push(
            ValidationIssue::new(
                IssueKind::RoundTripMismatch,
                table_name,
                format!(
                    "{} fact rows reference a {} row whose identity differs from the raw record",
                    coverage.mismatched_rows, table_name
                ),
            )
            .with_column(key_column)
            .with_count(coverage.mismatched_rows as u64)
            .with_samples(mismatch_samples),
        );
    }

    Ok(ReferentialResult { coverage, issues })
}
