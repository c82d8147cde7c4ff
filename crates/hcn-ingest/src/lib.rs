//! Raw visit export ingestion.
//!
//! This crate loads the flat, denormalized visit CSV into a [`RawDataset`]
//! and checks it against the raw column manifest before anything else runs.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use hcn_ingest::load_raw_dataset;
//!
//! let raw = load_raw_dataset(Path::new("data/legacy_healthcare_data.csv"))?;
//! println!("{} visits", raw.height());
//! ```

mod csv;
mod dataset;
mod error;
mod loader;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use self::csv::{CsvHeaders, normalize_header, read_csv_frame, read_csv_headers};

// === Raw Dataset ===
pub use dataset::{RawDataset, RawRecord};
pub use loader::load_raw_dataset;
