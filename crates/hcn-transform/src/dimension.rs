//! Dimension building: deduplication and surrogate key assignment.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use polars::prelude::{Column, DataFrame};
use serde::Serialize;
use tracing::{debug, trace, warn};

use hcn_common::redact_value;
use hcn_ingest::RawDataset;
use hcn_model::{DerivationKey, Dimension, KeyPolicy, SurrogateKey};

use crate::error::Result;
use crate::frame::{surrogate_column, text_column};
use crate::keys::derive_key;

/// Counters collected while building one dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    /// Raw records considered.
    pub input_rows: usize,
    /// Records excluded because an identity component was missing.
    pub excluded_null_identity: usize,
    /// Records whose key was already seen.
    pub duplicate_rows: usize,
    /// Duplicate records whose descriptive values differ from the kept row.
    pub inconsistent_rows: usize,
    /// Distinct keys with at least one inconsistent record.
    pub inconsistent_keys: usize,
}

/// Mapping from derivation key to surrogate key for one dimension.
///
/// Bijective over the dimension's members.
#[derive(Debug, Clone, Default)]
pub struct KeyLookup {
    entries: HashMap<DerivationKey, SurrogateKey>,
}

impl KeyLookup {
    pub fn get(&self, key: &DerivationKey) -> Option<&SurrogateKey> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DerivationKey, &SurrogateKey)> {
        self.entries.iter()
    }
}

/// A built dimension: its materialized table, key lookup and build counters.
#[derive(Debug, Clone)]
pub struct DimensionTable {
    pub dimension: Dimension,
    /// Surrogate column first, then attributes in declared order.
    pub frame: DataFrame,
    pub lookup: KeyLookup,
    pub stats: BuildStats,
}

impl DimensionTable {
    pub fn row_count(&self) -> usize {
        self.frame.height()
    }

    pub fn table_name(&self) -> &'static str {
        self.dimension.table_name()
    }
}

struct Member {
    key: DerivationKey,
    attributes: Vec<Option<String>>,
}

/// Builds one dimension table from the raw dataset.
///
/// Records with a null identity are excluded. Among records sharing a key the
/// first one in input order supplies the descriptive columns. Reused-key
/// dimensions keep first-seen row order; generated-key dimensions are sorted
/// by key and numbered densely from 1, so two runs over the same input assign
/// the same surrogates.
pub fn build_dimension(dimension: Dimension, raw: &RawDataset) -> Result<DimensionTable> {
    let attribute_columns = dimension.attribute_columns();
    let mut stats = BuildStats {
        input_rows: raw.height(),
        ..BuildStats::default()
    };
    let mut members: Vec<Member> = Vec::new();
    let mut positions: HashMap<DerivationKey, usize> = HashMap::new();
    let mut inconsistent: BTreeSet<usize> = BTreeSet::new();

    for record in raw.records() {
        let Some(key) = derive_key(dimension, &record) else {
            stats.excluded_null_identity += 1;
            continue;
        };
        let attributes: Vec<Option<&str>> = attribute_columns
            .iter()
            .map(|column| record.get(column))
            .collect();

        match positions.entry(key) {
            Entry::Occupied(entry) => {
                stats.duplicate_rows += 1;
                let position = *entry.get();
                let kept = &members[position].attributes;
                let differs = kept
                    .iter()
                    .zip(&attributes)
                    .any(|(kept, seen)| kept.as_deref() != *seen);
                if differs {
                    stats.inconsistent_rows += 1;
                    if inconsistent.insert(position) {
                        trace!(
                            dimension = %dimension,
                            key = redact_value(&entry.key().to_string()),
                            row = record.row(),
                            "descriptive values differ from first-seen row"
                        );
                    }
                }
            }
            Entry::Vacant(entry) => {
                members.push(Member {
                    key: entry.key().clone(),
                    attributes: attributes
                        .into_iter()
                        .map(|value| value.map(str::to_string))
                        .collect(),
                });
                entry.insert(members.len() - 1);
            }
        }
    }
    stats.inconsistent_keys = inconsistent.len();

    let surrogates: Vec<SurrogateKey> = match dimension.policy() {
        KeyPolicy::Reused => members
            .iter()
            .map(|member| SurrogateKey::Natural(natural_value(&member.key)))
            .collect(),
        KeyPolicy::Generated => {
            members.sort_by(|a, b| a.key.cmp(&b.key));
            (1..=members.len())
                .map(|ordinal| SurrogateKey::Generated(ordinal as i64))
                .collect()
        }
    };

    let frame = materialize(dimension, &members, &surrogates)?;
    let lookup = KeyLookup {
        entries: members
            .into_iter()
            .map(|member| member.key)
            .zip(surrogates)
            .collect(),
    };

    if stats.excluded_null_identity > 0 {
        warn!(
            dimension = %dimension,
            excluded = stats.excluded_null_identity,
            "records with missing identity excluded"
        );
    }
    if stats.inconsistent_keys > 0 {
        warn!(
            dimension = %dimension,
            inconsistent_keys = stats.inconsistent_keys,
            inconsistent_rows = stats.inconsistent_rows,
            "conflicting descriptive values; first-seen row kept"
        );
    }
    debug!(
        dimension = %dimension,
        rows = frame.height(),
        duplicates = stats.duplicate_rows,
        "dimension built"
    );

    Ok(DimensionTable {
        dimension,
        frame,
        lookup,
        stats,
    })
}

fn natural_value(key: &DerivationKey) -> String {
    match key {
        DerivationKey::Natural(value) => value.clone(),
        DerivationKey::Composite(parts) => parts.join("|"),
    }
}

fn materialize(
    dimension: Dimension,
    members: &[Member],
    surrogates: &[SurrogateKey],
) -> Result<DataFrame> {
    let attribute_columns = dimension.attribute_columns();
    let mut columns: Vec<Column> = Vec::with_capacity(1 + attribute_columns.len());
    let keys: Vec<Option<&SurrogateKey>> = surrogates.iter().map(Some).collect();
    columns.push(surrogate_column(
        dimension,
        dimension.surrogate_column(),
        &keys,
    ));
    for (idx, name) in attribute_columns.iter().enumerate() {
        let values: Vec<Option<String>> = members
            .iter()
            .map(|member| member.attributes[idx].clone())
            .collect();
        columns.push(text_column(name, values));
    }
    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    use hcn_model::columns::RAW_COLUMNS;

    use super::*;

    fn dataset(rows: &[&[(&str, Option<&str>)]]) -> RawDataset {
        let columns: Vec<Column> = RAW_COLUMNS
            .iter()
            .map(|name| {
                let values: Vec<Option<String>> = rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .find(|(column, _)| column == name)
                            .and_then(|(_, value)| value.map(str::to_string))
                    })
                    .collect();
                Series::new((*name).into(), values).into_column()
            })
            .collect();
        RawDataset::from_frame(DataFrame::new(columns).unwrap(), "inline").unwrap()
    }

    #[test]
    fn test_generated_keys_are_sorted_and_dense() {
        let raw = dataset(&[
            &[("clinic_name", Some("West")), ("room_number", Some("2"))],
            &[("clinic_name", Some("East")), ("room_number", Some("9"))],
            &[("clinic_name", Some("West")), ("room_number", Some("2"))],
        ]);
        let table = build_dimension(Dimension::Location, &raw).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.stats.duplicate_rows, 1);

        let east = DerivationKey::Composite(vec!["East".into(), "9".into()]);
        let west = DerivationKey::Composite(vec!["West".into(), "2".into()]);
        assert_eq!(table.lookup.get(&east), Some(&SurrogateKey::Generated(1)));
        assert_eq!(table.lookup.get(&west), Some(&SurrogateKey::Generated(2)));

        let ids = table.frame.column("location_id").unwrap().i64().unwrap();
        assert_eq!(ids.get(0), Some(1));
        let clinics = table.frame.column("clinic_name").unwrap().str().unwrap();
        assert_eq!(clinics.get(0), Some("East"));
    }

    #[test]
    fn test_first_seen_wins_for_reused_keys() {
        let raw = dataset(&[
            &[("prescription_id", Some("RX2")), ("prescription_dosage", Some("10mg"))],
            &[("prescription_id", Some("RX1")), ("prescription_dosage", Some("5mg"))],
            &[("prescription_id", Some("RX2")), ("prescription_dosage", Some("20mg"))],
        ]);
        let table = build_dimension(Dimension::Prescription, &raw).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.stats.inconsistent_rows, 1);
        assert_eq!(table.stats.inconsistent_keys, 1);

        let ids = table.frame.column("prescription_id").unwrap().str().unwrap();
        assert_eq!(ids.get(0), Some("RX2"));
        assert_eq!(ids.get(1), Some("RX1"));
        let dosage = table
            .frame
            .column("prescription_dosage")
            .unwrap()
            .str()
            .unwrap();
        assert_eq!(dosage.get(0), Some("10mg"));
    }

    #[test]
    fn test_null_identity_is_excluded() {
        let raw = dataset(&[
            &[
                ("doctor_name", None),
                ("doctor_title", Some("MD")),
                ("doctor_department", Some("ER")),
            ],
            &[
                ("doctor_name", Some("Lee")),
                ("doctor_title", Some("MD")),
                ("doctor_department", Some("ER")),
            ],
        ]);
        let table = build_dimension(Dimension::Provider, &raw).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.stats.excluded_null_identity, 1);
        assert_eq!(table.stats.input_rows, 2);
    }

    #[test]
    fn test_columns_follow_declared_order() {
        let raw = dataset(&[&[("patient_id", Some("P1"))]]);
        let table = build_dimension(Dimension::Patient, &raw).unwrap();
        let names: Vec<String> = table
            .frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        let expected: Vec<String> = std::iter::once(Dimension::Patient.surrogate_column())
            .chain(Dimension::Patient.attribute_columns().iter().copied())
            .map(str::to_string)
            .collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_empty_input_builds_empty_table() {
        let raw = dataset(&[]);
        let table = build_dimension(Dimension::Treatment, &raw).unwrap();
        assert_eq!(table.row_count(), 0);
        assert!(table.lookup.is_empty());
        assert_eq!(table.frame.width(), 3);
    }
}
