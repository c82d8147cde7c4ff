//! Normalization engine for the flat visit export.
//!
//! This crate turns a [`hcn_ingest::RawDataset`] into a dimensional schema:
//!
//! - **keys**: derivation keys identifying dimension entities in raw records
//! - **dimension**: deduplication and surrogate key assignment per dimension
//! - **status**: the patient activity rule merged into DimPatient
//! - **fact**: `FactVisit` assembly, one row per raw record
//! - **pipeline**: [`normalize`] and the [`PipelineContext`] stages
//!
//! # Example
//!
//! ```ignore
//! use hcn_transform::{NormalizeOptions, normalize};
//!
//! let schema = normalize(&raw, NormalizeOptions::default())?;
//! assert_eq!(schema.fact.row_count(), raw.height());
//! ```

pub mod context;
pub mod datetime;
pub mod dimension;
pub mod error;
pub mod fact;
pub mod frame;
pub mod keys;
pub mod pipeline;
pub mod status;

pub use context::{NormalizeOptions, PipelineContext};
pub use dimension::{BuildStats, DimensionTable, KeyLookup, build_dimension};
pub use error::{Result, TransformError};
pub use fact::{FactTable, assemble_fact};
pub use keys::{derive_key, derive_keys};
pub use pipeline::{NormalizedSchema, apply_patient_status, build_dimensions, normalize};
pub use status::{
    DEFAULT_ACTIVITY_CUTOFF, StatusRule, attach_status, derive_status, derive_statuses,
};
