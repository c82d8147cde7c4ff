//! Versioned column manifests for the raw input and every output table.
//!
//! Manifests are declared up front instead of being inferred from join
//! results; readers and writers check frames against them so schema drift is
//! reported instead of silently propagating.

use serde::{Deserialize, Serialize};

use crate::columns::{RAW_COLUMNS, VISIT_DATE, VISIT_ID, VISIT_TYPE};
use crate::dimension::{Dimension, KeyPolicy};
use crate::error::Result;

/// Manifest version. Bump when any column list or type changes.
pub const MANIFEST_VERSION: u32 = 1;

/// Name of the raw input table in diagnostics.
pub const RAW_TABLE: &str = "LegacyVisits";

/// Name of the fact table.
pub const FACT_TABLE: &str = "FactVisit";

/// Logical column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    Integer,
    /// ISO 8601 `YYYY-MM-DDTHH:MM:SS` text.
    Timestamp,
}

impl ColumnType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Timestamp => "timestamp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub column_type: ColumnType,
    /// Whether null values are permitted.
    pub nullable: bool,
}

impl ColumnSpec {
    fn new(name: &str, column_type: ColumnType, nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            nullable,
        }
    }
}

/// Ordered column declaration for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableManifest {
    pub name: String,
    pub version: u32,
    pub columns: Vec<ColumnSpec>,
}

impl TableManifest {
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns declared by the manifest but absent from `present`.
    pub fn missing_columns<'a, I>(&self, present: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let present: Vec<&str> = present.into_iter().collect();
        self.columns
            .iter()
            .filter(|spec| !present.contains(&spec.name.as_str()))
            .map(|spec| spec.name.clone())
            .collect()
    }
}

fn surrogate_type(dimension: Dimension) -> ColumnType {
    match dimension.policy() {
        KeyPolicy::Reused => ColumnType::Text,
        KeyPolicy::Generated => ColumnType::Integer,
    }
}

/// Manifest of the flat visit export. Every column is text and nullable.
pub fn raw_manifest() -> TableManifest {
    TableManifest {
        name: RAW_TABLE.to_string(),
        version: MANIFEST_VERSION,
        columns: RAW_COLUMNS
            .iter()
            .map(|name| ColumnSpec::new(name, ColumnType::Text, true))
            .collect(),
    }
}

pub fn dimension_manifest(dimension: Dimension) -> TableManifest {
    let mut columns = vec![ColumnSpec::new(
        dimension.surrogate_column(),
        surrogate_type(dimension),
        false,
    )];
    for name in dimension.attribute_columns() {
        columns.push(ColumnSpec::new(name, ColumnType::Text, true));
    }
    for name in dimension.derived_columns() {
        columns.push(ColumnSpec::new(name, ColumnType::Text, false));
    }
    TableManifest {
        name: dimension.table_name().to_string(),
        version: MANIFEST_VERSION,
        columns,
    }
}

/// `FactVisit`: one foreign key per dimension in declaration order, then measures.
pub fn fact_manifest() -> TableManifest {
    let mut columns: Vec<ColumnSpec> = Dimension::ALL
        .iter()
        .map(|dimension| {
            ColumnSpec::new(dimension.surrogate_column(), surrogate_type(*dimension), true)
        })
        .collect();
    columns.push(ColumnSpec::new(VISIT_ID, ColumnType::Text, true));
    columns.push(ColumnSpec::new(VISIT_DATE, ColumnType::Timestamp, true));
    columns.push(ColumnSpec::new(VISIT_TYPE, ColumnType::Text, true));
    TableManifest {
        name: FACT_TABLE.to_string(),
        version: MANIFEST_VERSION,
        columns,
    }
}

/// All eleven output manifests: dimensions in declaration order, then the fact.
pub fn output_manifests() -> Vec<TableManifest> {
    let mut manifests: Vec<TableManifest> =
        Dimension::ALL.iter().map(|d| dimension_manifest(*d)).collect();
    manifests.push(fact_manifest());
    manifests
}

/// Manifest of one output table by name (case-insensitive).
pub fn table_manifest(name: &str) -> Result<TableManifest> {
    if name.trim().eq_ignore_ascii_case(FACT_TABLE) {
        return Ok(fact_manifest());
    }
    name.parse::<Dimension>().map(dimension_manifest)
}
