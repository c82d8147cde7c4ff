//! Dataset-level visit completeness checks.

use std::collections::{BTreeMap, BTreeSet};

use polars::prelude::DataFrame;

use hcn_common::non_blank;
use hcn_ingest::RawDataset;
use hcn_model::columns::VISIT_ID;
use hcn_model::{FACT_TABLE, IssueKind, RAW_TABLE, ValidationIssue};

use crate::error::Result;
use crate::util::{push_sample, text_values};

/// Compares distinct visit counts between input and fact, and reports
/// `visit_id` values that occur on more than one record.
pub(crate) fn check_visits(
    fact: &DataFrame,
    raw: Option<&RawDataset>,
) -> Result<Vec<ValidationIssue>> {
    let fact_ids = text_values(fact, FACT_TABLE, VISIT_ID)?;
    let fact_visits: Vec<&str> = fact_ids.into_iter().flatten().filter_map(non_blank).collect();

    let mut issues = Vec::new();
    let (source, visits): (&str, Vec<&str>) = match raw {
        Some(raw) => {
            let raw_visits: Vec<&str> = (0..raw.height())
                .filter_map(|row| raw.value(VISIT_ID, row))
                .collect();
            let raw_distinct: BTreeSet<&str> = raw_visits.iter().copied().collect();
            let fact_distinct: BTreeSet<&str> = fact_visits.iter().copied().collect();
            if raw_distinct.len() != fact_distinct.len() {
                issues.push(
                    ValidationIssue::new(
                        IssueKind::VisitCountMismatch,
                        FACT_TABLE,
                        format!(
                            "{} distinct visits in the input but {} in {}",
                            raw_distinct.len(),
                            fact_distinct.len(),
                            FACT_TABLE
                        ),
                    )
                    .with_column(VISIT_ID)
                    .with_count(raw_distinct.len().abs_diff(fact_distinct.len()) as u64),
                );
            }
            (RAW_TABLE, raw_visits)
        }
        None => (FACT_TABLE, fact_visits),
    };

    let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
    for visit in &visits {
        *occurrences.entry(*visit).or_default() += 1;
    }
    let mut samples = Vec::new();
    let mut duplicated_ids = 0usize;
    let mut duplicated_rows = 0usize;
    for (visit, count) in occurrences.into_iter().filter(|(_, count)| *count > 1) {
        duplicated_ids += 1;
        duplicated_rows += count;
        push_sample(&mut samples, visit);
    }
    if duplicated_ids > 0 {
        issues.push(
            ValidationIssue::new(
                IssueKind::DuplicateVisitId,
                source,
                format!("{duplicated_ids} visit ids appear on {duplicated_rows} records"),
            )
            .with_column(VISIT_ID)
            .with_count(duplicated_ids as u64)
            .with_samples(samples),
        );
    }

    Ok(issues)
}
