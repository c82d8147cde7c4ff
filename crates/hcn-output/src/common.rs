//! Shared helpers for output generation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use polars::prelude::{DataFrame, DataType};

use hcn_model::{ColumnType, TableManifest};

/// Ensure a parent directory exists for a file path.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    Ok(())
}

/// Ensure the output directory exists.
pub fn ensure_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))
}

/// Physical column type a manifest column must have.
pub fn expected_dtype(column_type: ColumnType) -> DataType {
    match column_type {
        ColumnType::Text | ColumnType::Timestamp => DataType::String,
        ColumnType::Integer => DataType::Int64,
    }
}

/// Selects the manifest's columns, in manifest order, and checks their types.
///
/// Fails when a declared column is missing, has another type, or holds nulls
/// although the manifest declares it non-nullable.
pub fn conform_to_manifest(frame: &DataFrame, manifest: &TableManifest) -> Result<DataFrame> {
    let present: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let missing = manifest.missing_columns(present.iter().map(String::as_str));
    if !missing.is_empty() {
        bail!(
            "{} (manifest v{}) is missing column(s): {}",
            manifest.name,
            manifest.version,
            missing.join(", ")
        );
    }

    let selected = frame
        .select(manifest.column_names())
        .with_context(|| format!("select {} columns", manifest.name))?;
    for spec in &manifest.columns {
        let column = selected.column(&spec.name)?;
        let expected = expected_dtype(spec.column_type);
        if column.dtype() != &expected {
            bail!(
                "{}.{} should be {} ({expected}) but is {}",
                manifest.name,
                spec.name,
                spec.column_type.label(),
                column.dtype()
            );
        }
        if !spec.nullable && column.null_count() > 0 {
            bail!(
                "{}.{} is not nullable but has {} null value(s)",
                manifest.name,
                spec.name,
                column.null_count()
            );
        }
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

    use hcn_model::{Dimension, dimension_manifest};

    use super::*;

    fn location_frame(ids: Vec<Option<i64>>) -> DataFrame {
        let rows = ids.len();
        let columns: Vec<Column> = vec![
            Series::new("room_number".into(), vec![Some("1".to_string()); rows]).into_column(),
            Series::new("location_id".into(), ids).into_column(),
            Series::new("clinic_name".into(), vec![Some("West".to_string()); rows]).into_column(),
        ];
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn test_conform_reorders_columns() {
        let manifest = dimension_manifest(Dimension::Location);
        let frame = conform_to_manifest(&location_frame(vec![Some(1)]), &manifest).unwrap();
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["location_id", "clinic_name", "room_number"]);
    }

    #[test]
    fn test_conform_rejects_null_surrogate() {
        let manifest = dimension_manifest(Dimension::Location);
        let err = conform_to_manifest(&location_frame(vec![None]), &manifest).unwrap_err();
        assert!(err.to_string().contains("not nullable"), "{err}");
    }

    #[test]
    fn test_conform_rejects_wrong_type() {
        let manifest = dimension_manifest(Dimension::Location);
        let frame = location_frame(vec![Some(1)])
            .drop("location_id")
            .unwrap()
            .hstack(&[Series::new("location_id".into(), vec!["1"]).into_column()])
            .unwrap();
        let err = conform_to_manifest(&frame, &manifest).unwrap_err();
        assert!(err.to_string().contains("should be integer"), "{err}");
    }

    #[test]
    fn test_conform_reports_missing_columns() {
        let manifest = dimension_manifest(Dimension::Location);
        let frame = location_frame(vec![Some(1)]).drop("room_number").unwrap();
        let err = conform_to_manifest(&frame, &manifest).unwrap_err();
        assert!(err.to_string().contains("room_number"), "{err}");
    }
}
