//! Patient activity status.
//!
//! A patient is `Active` when at least one of their visits falls on a calendar
//! date strictly after the activity cutoff, and `Inactive` otherwise. Visits
//! with a missing or unparseable timestamp never qualify, so a patient whose
//! dates are all unknown is `Inactive`.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use hcn_ingest::RawDataset;
use hcn_model::PatientStatus;
use hcn_model::columns::{PATIENT_ID, PATIENT_STATUS, VISIT_DATETIME};

use crate::datetime::parse_visit_date;
use crate::dimension::DimensionTable;
use crate::error::{Result, TransformError};
use crate::frame::text_column;

/// Last calendar date that does not count as recent activity.
pub const DEFAULT_ACTIVITY_CUTOFF: NaiveDate = match NaiveDate::from_ymd_opt(2021, 12, 31) {
    Some(date) => date,
    None => NaiveDate::MIN,
};

/// The rule deciding whether a patient is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRule {
    /// Visits must fall strictly after this date to qualify.
    pub cutoff: NaiveDate,
}

impl Default for StatusRule {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_ACTIVITY_CUTOFF,
        }
    }
}

impl StatusRule {
    pub fn new(cutoff: NaiveDate) -> Self {
        Self { cutoff }
    }

    /// Whether one raw `visit_datetime` value is a qualifying activity record.
    pub fn is_qualifying(&self, visit_datetime: Option<&str>) -> bool {
        visit_datetime
            .and_then(parse_visit_date)
            .is_some_and(|date| date > self.cutoff)
    }

    /// Status from a patient's visit timestamps.
    pub fn status_for<'a, I>(&self, visit_datetimes: I) -> PatientStatus
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        if visit_datetimes
            .into_iter()
            .any(|value| self.is_qualifying(value))
        {
            PatientStatus::Active
        } else {
            PatientStatus::Inactive
        }
    }
}

/// Derives the status of a single patient by scanning the raw dataset.
pub fn derive_status(patient_id: &str, raw: &RawDataset, rule: &StatusRule) -> PatientStatus {
    let patient_id = patient_id.trim();
    rule.status_for(
        raw.records()
            .filter(|record| record.get(PATIENT_ID) == Some(patient_id))
            .map(|record| record.get(VISIT_DATETIME)),
    )
}

/// Derives the status of every patient in one pass over the raw dataset.
///
/// Records without a patient id are skipped; they have no DimPatient row.
pub fn derive_statuses(raw: &RawDataset, rule: &StatusRule) -> HashMap<String, PatientStatus> {
    let mut statuses: HashMap<String, PatientStatus> = HashMap::new();
    for record in raw.records() {
        let Some(patient_id) = record.get(PATIENT_ID) else {
            continue;
        };
        let status = statuses
            .entry(patient_id.to_string())
            .or_insert(PatientStatus::Inactive);
        if *status == PatientStatus::Inactive && rule.is_qualifying(record.get(VISIT_DATETIME)) {
            *status = PatientStatus::Active;
        }
    }
    statuses
}

/// Appends `patient_status` to DimPatient, aligned on `patient_id`.
///
/// Every patient must have a derived status, and the table's row count must
/// not change.
pub fn attach_status(
    table: &mut DimensionTable,
    statuses: &HashMap<String, PatientStatus>,
) -> Result<()> {
    let expected = table.frame.height();
    let ids = table.frame.column(PATIENT_ID)?.str()?.clone();

    let mut values: Vec<Option<String>> = Vec::with_capacity(expected);
    let mut active = 0usize;
    for id in &ids {
        let id = id.unwrap_or_default();
        let status = statuses
            .get(id)
            .ok_or_else(|| TransformError::MissingStatus {
                patient_id: id.to_string(),
            })?;
        if *status == PatientStatus::Active {
            active += 1;
        }
        values.push(Some(status.as_str().to_string()));
    }

    table
        .frame
        .with_column(text_column(PATIENT_STATUS, values))?;
    let actual = table.frame.height();
    if actual != expected {
        return Err(TransformError::StatusMergeMismatch { expected, actual });
    }
    debug!(
        patients = expected,
        active,
        inactive = expected - active,
        "patient status attached"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cutoff_is_exclusive() {
        let rule = StatusRule::default();
        assert!(!rule.is_qualifying(Some("2021-12-31 23:59:59")));
        assert!(rule.is_qualifying(Some("2022-01-01 00:00:00")));
        assert!(!rule.is_qualifying(Some("garbage")));
        assert!(!rule.is_qualifying(None));
    }

    #[test]
    fn test_status_for_any_qualifying_visit() {
        let rule = StatusRule::default();
        assert_eq!(
            rule.status_for([Some("2020-05-01"), Some("2023-02-02 10:00:00")]),
            PatientStatus::Active
        );
        assert_eq!(
            rule.status_for([Some("2020-05-01"), None]),
            PatientStatus::Inactive
        );
        assert_eq!(rule.status_for([]), PatientStatus::Inactive);
    }

    #[test]
    fn test_custom_cutoff() {
        let rule = StatusRule::new(NaiveDate::from_ymd_opt(2023, 6, 30).unwrap());
        assert_eq!(
            rule.status_for([Some("2023-06-30 12:00:00")]),
            PatientStatus::Inactive
        );
        assert_eq!(
            rule.status_for([Some("2023-07-01 08:00:00")]),
            PatientStatus::Active
        );
    }
}
