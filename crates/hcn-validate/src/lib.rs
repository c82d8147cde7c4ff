//! Join validator for the dimensional schema.
//!
//! Diagnostic only: the checks read the fact and dimension tables (and,
//! when available, the raw dataset) and return a [`ValidationReport`]. They
//! never change any table.
//!
//! - **referential**: null and orphan foreign keys per dimension, and the
//!   round trip from each fact row back to its raw record
//! - **completeness**: distinct visit counts and duplicated `visit_id`s

mod checks;
mod error;
mod util;

use std::collections::BTreeMap;

use polars::prelude::DataFrame;
use tracing::{info, info_span, warn};

use hcn_ingest::RawDataset;
use hcn_model::{Dimension, IssueSeverity, ValidationReport};
use hcn_transform::NormalizedSchema;

pub use error::{Result, ValidateError};

use checks::{ReferentialResult, check_dimension, check_visits};

/// Tables to validate.
#[derive(Debug, Clone)]
pub struct ValidationInput<'a> {
    pub fact: &'a DataFrame,
    pub dimensions: BTreeMap<Dimension, &'a DataFrame>,
    /// Enables the round-trip and visit count checks.
    pub raw: Option<&'a RawDataset>,
}

impl<'a> ValidationInput<'a> {
    pub fn new(fact: &'a DataFrame) -> Self {
        Self {
            fact,
            dimensions: BTreeMap::new(),
            raw: None,
        }
    }

    /// All tables of a normalized schema.
    pub fn from_schema(schema: &'a NormalizedSchema) -> Self {
        Self {
            fact: &schema.fact.frame,
            dimensions: schema
                .dimensions
                .iter()
                .map(|(dimension, table)| (*dimension, &table.frame))
                .collect(),
            raw: None,
        }
    }

    #[must_use]
    pub fn with_dimension(mut self, dimension: Dimension, frame: &'a DataFrame) -> Self {
        self.dimensions.insert(dimension, frame);
        self
    }

    #[must_use]
    pub fn with_raw(mut self, raw: &'a RawDataset) -> Self {
        self.raw = Some(raw);
        self
    }
}

/// Runs every check and collects the findings.
///
/// Dimensions missing from the input are skipped. Issues are ordered by
/// severity (errors first), then by table and column.
pub fn validate(input: &ValidationInput<'_>) -> Result<ValidationReport> {
    let span = info_span!("validate", fact_rows = input.fact.height());
    let _guard = span.enter();

    let mut report = ValidationReport {
        coverage: Vec::with_capacity(input.dimensions.len()),
        issues: Vec::new(),
        raw_rows: input.raw.map(RawDataset::height),
        fact_rows: input.fact.height(),
    };

    for (dimension, table) in &input.dimensions {
        let ReferentialResult { coverage, issues } =
            check_dimension(*dimension, input.fact, table, input.raw)?;
        report.coverage.push(coverage);
        report.issues.extend(issues);
    }
    report.issues.extend(check_visits(input.fact, input.raw)?);

    report.issues.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| a.table.cmp(&b.table))
            .then_with(|| a.column.cmp(&b.column))
    });

    for issue in &report.issues {
        if issue.severity == IssueSeverity::Error {
            warn!(
                code = issue.kind.code(),
                table = %issue.table,
                count = issue.count,
                "{}",
                issue.message
            );
        }
    }
    info!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        "validation complete"
    );
    Ok(report)
}

/// Validates a normalized schema, with the raw dataset it was built from.
pub fn validate_schema(schema: &NormalizedSchema, raw: &RawDataset) -> Result<ValidationReport> {
    validate(&ValidationInput::from_schema(schema).with_raw(raw))
}
