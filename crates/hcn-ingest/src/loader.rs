//! Loading the raw visit export from disk.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use hcn_model::columns::raw_column_index;
use hcn_model::{MANIFEST_VERSION, raw_manifest};

use crate::csv::{read_csv_frame, read_csv_headers};
use crate::dataset::RawDataset;
use crate::error::{IngestError, Result};

/// Loads and schema-checks the flat visit export.
///
/// The header is checked against the raw manifest before any data is parsed,
/// so a schema mismatch fails fast with every missing column listed.
pub fn load_raw_dataset(path: &Path) -> Result<RawDataset> {
    let start = Instant::now();
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let headers = read_csv_headers(path)?;
    let manifest = raw_manifest();
    let missing = manifest.missing_columns(headers.columns.iter().map(String::as_str));
    if !missing.is_empty() {
        return Err(IngestError::SchemaMismatch {
            source_name: path.display().to_string(),
            version: MANIFEST_VERSION,
            missing,
        });
    }
    let extra: Vec<&str> = headers
        .columns
        .iter()
        .map(String::as_str)
        .filter(|name| raw_column_index(name).is_none())
        .collect();
    if !extra.is_empty() {
        warn!(
            path = %path.display(),
            extra_columns = ?extra,
            "ignoring columns not declared by the raw manifest"
        );
    }

    let frame = read_csv_frame(path, &headers)?;
    let dataset = RawDataset::from_frame(frame, path.display().to_string())?;
    if dataset.is_empty() {
        warn!(path = %path.display(), "raw input has a header but no records");
    }
    debug!(
        path = %path.display(),
        columns = headers.len(),
        "raw header accepted"
    );
    info!(
        path = %path.display(),
        record_count = dataset.height(),
        duration_ms = start.elapsed().as_millis(),
        "raw input loaded"
    );
    Ok(dataset)
}
