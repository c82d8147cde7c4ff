//! Data model for the visit normalizer.
//!
//! Column names, the dimension registry, derivation and surrogate keys,
//! table manifests and validation report types. This crate has no
//! dataframe dependency; it only describes the schema.

pub mod columns;
pub mod dimension;
pub mod error;
pub mod keys;
pub mod manifest;
pub mod report;
pub mod status;

pub use dimension::{Dimension, KeyPolicy};
pub use error::{ModelError, Result};
pub use keys::{DerivationKey, SurrogateKey};
pub use manifest::{
    ColumnSpec, ColumnType, FACT_TABLE, MANIFEST_VERSION, RAW_TABLE, TableManifest,
    dimension_manifest, fact_manifest, output_manifests, raw_manifest, table_manifest,
};
pub use report::{
    DimensionCoverage, IssueKind, IssueSeverity, ValidationIssue, ValidationReport,
};
pub use status::PatientStatus;
