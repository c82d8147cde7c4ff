//! Derivation keys: the identity of a dimension entity within one raw record.

use hcn_ingest::{RawDataset, RawRecord};
use hcn_model::{DerivationKey, Dimension, KeyPolicy};

/// Derives the deduplication key of `dimension` for one raw record.
///
/// Reused-key dimensions yield [`DerivationKey::Natural`], generated-key
/// dimensions a [`DerivationKey::Composite`] ordered as the identity columns.
/// Returns `None` when any identity component is missing or blank; such
/// records never become members of the dimension.
pub fn derive_key(dimension: Dimension, record: &RawRecord<'_>) -> Option<DerivationKey> {
    let columns = dimension.identity_columns();
    match dimension.policy() {
        KeyPolicy::Reused => {
            let [column] = columns else {
                return composite(columns, record);
            };
            record
                .get(column)
                .map(|value| DerivationKey::Natural(value.to_string()))
        }
        KeyPolicy::Generated => composite(columns, record),
    }
}

fn composite(columns: &[&str], record: &RawRecord<'_>) -> Option<DerivationKey> {
    let parts = columns
        .iter()
        .map(|column| record.get(column).map(str::to_string))
        .collect::<Option<Vec<_>>>()?;
    Some(DerivationKey::Composite(parts))
}

/// Keys of every record, in input order.
pub fn derive_keys(dimension: Dimension, raw: &RawDataset) -> Vec<Option<DerivationKey>> {
    raw.records()
        .map(|record| derive_key(dimension, &record))
        .collect()
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

    use hcn_model::columns::RAW_COLUMNS;

    use super::*;

    fn single_row(overrides: &[(&str, Option<&str>)]) -> RawDataset {
        let columns: Vec<Column> = RAW_COLUMNS
            .iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(column, _)| column == name)
                    .map(|(_, value)| value.map(str::to_string))
                    .unwrap_or_else(|| Some(format!("{name}-0")));
                Series::new((*name).into(), vec![value]).into_column()
            })
            .collect();
        RawDataset::from_frame(DataFrame::new(columns).unwrap(), "inline").unwrap()
    }

    #[test]
    fn test_reused_key_is_natural() {
        let raw = single_row(&[("patient_id", Some(" P001 "))]);
        assert_eq!(
            derive_key(Dimension::Patient, &raw.record(0)),
            Some(DerivationKey::Natural("P001".to_string()))
        );
    }

    #[test]
    fn test_generated_key_is_ordered_composite() {
        let raw = single_row(&[
            ("clinic_name", Some("West Clinic")),
            ("room_number", Some("12")),
        ]);
        assert_eq!(
            derive_key(Dimension::Location, &raw.record(0)),
            Some(DerivationKey::Composite(vec![
                "West Clinic".to_string(),
                "12".to_string()
            ]))
        );
    }

    #[test]
    fn test_missing_component_yields_none() {
        let raw = single_row(&[("doctor_title", None), ("lab_order_id", Some("  "))]);
        assert_eq!(derive_key(Dimension::Provider, &raw.record(0)), None);
        assert_eq!(derive_key(Dimension::LabOrder, &raw.record(0)), None);
        assert!(derive_key(Dimension::Location, &raw.record(0)).is_some());
    }

    #[test]
    fn test_derive_keys_follows_input_order() {
        let raw = single_row(&[]);
        let keys = derive_keys(Dimension::Treatment, &raw);
        assert_eq!(keys.len(), 1);
        assert_eq!(
            keys[0].as_ref().map(DerivationKey::parts),
            Some(vec!["treatment_code-0", "treatment_desc-0"])
        );
    }
}
