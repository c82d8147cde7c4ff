//! CSV output of the dimensional schema.
//!
//! All tables are first written to a staging directory inside the output
//! directory. Only when every table was written are the files moved into
//! place; a failed move undoes the earlier ones and restores the files they
//! replaced, so a failed run never leaves a partial set of tables behind.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::{debug, info, warn};

use hcn_model::{TableManifest, output_manifests};
use hcn_transform::NormalizedSchema;

use crate::common::{conform_to_manifest, ensure_output_dir};

/// One table ready to be written.
#[derive(Debug, Clone)]
pub struct OutputTable<'a> {
    pub manifest: TableManifest,
    pub frame: &'a DataFrame,
}

impl OutputTable<'_> {
    pub fn file_name(&self) -> String {
        table_file_name(&self.manifest.name)
    }
}

/// File name of a table: `<Table>.csv`.
pub fn table_file_name(table: &str) -> String {
    format!("{table}.csv")
}

/// Paths the eleven tables are written to.
pub fn planned_outputs(output_dir: &Path) -> Vec<PathBuf> {
    output_manifests()
        .iter()
        .map(|manifest| output_dir.join(table_file_name(&manifest.name)))
        .collect()
}

/// Pairs each output manifest with the schema's frame of the same name.
pub fn schema_tables(schema: &NormalizedSchema) -> Result<Vec<OutputTable<'_>>> {
    let frames = schema.tables();
    output_manifests()
        .into_iter()
        .map(|manifest| {
            let frame = frames
                .iter()
                .find(|(name, _)| *name == manifest.name)
                .map(|(_, frame)| *frame)
                .ok_or_else(|| anyhow!("schema has no {} table", manifest.name))?;
            Ok(OutputTable { manifest, frame })
        })
        .collect()
}

/// Writes one frame as CSV with a header row.
///
/// Fields containing the separator, quotes or line breaks are quoted.
pub fn write_table_csv(path: &Path, frame: &DataFrame) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut frame = frame.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut frame)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Writes every table into `output_dir`, all or nothing.
///
/// Each frame is checked against its manifest before anything is written.
/// Returns the final paths in manifest order.
pub fn write_csv_outputs(output_dir: &Path, tables: &[OutputTable<'_>]) -> Result<Vec<PathBuf>> {
    let conformed = tables
        .iter()
        .map(|table| {
            conform_to_manifest(table.frame, &table.manifest)
                .map(|frame| (table.file_name(), frame))
        })
        .collect::<Result<Vec<_>>>()?;

    ensure_output_dir(output_dir)?;
    let staging = tempfile::Builder::new()
        .prefix(".hcn-staging-")
        .tempdir_in(output_dir)
        .with_context(|| format!("create staging directory in {}", output_dir.display()))?;

    for (file_name, frame) in &conformed {
        let path = staging.path().join(file_name);
        write_table_csv(&path, frame)?;
        debug!(file = %file_name, rows = frame.height(), "table staged");
    }

    let file_names: Vec<&str> = conformed.iter().map(|(name, _)| name.as_str()).collect();
    let outputs = publish_staged(staging.path(), output_dir, &file_names)?;
    info!(
        output_dir = %output_dir.display(),
        tables = outputs.len(),
        "tables written"
    );
    Ok(outputs)
}

/// A file moved out of staging, with the earlier file it replaced.
struct Published {
    staged: PathBuf,
    target: PathBuf,
    previous: Option<PathBuf>,
}

/// Moves staged files into `output_dir`.
///
/// Existing files are parked in the staging directory first. If any move
/// fails, the moves already made are undone and the parked files restored.
fn publish_staged(
    staging: &Path,
    output_dir: &Path,
    file_names: &[&str],
) -> Result<Vec<PathBuf>> {
    let mut published: Vec<Published> = Vec::with_capacity(file_names.len());
    for file_name in file_names {
        match publish_one(staging, output_dir, file_name) {
            Ok(entry) => published.push(entry),
            Err(error) => {
                roll_back(&published);
                return Err(error);
            }
        }
    }
    Ok(published.into_iter().map(|entry| entry.target).collect())
}

fn publish_one(staging: &Path, output_dir: &Path, file_name: &str) -> Result<Published> {
    let staged = staging.join(file_name);
    let target = output_dir.join(file_name);
    let previous = if target.is_file() {
        let parked = staging.join(format!("previous-{file_name}"));
        fs::rename(&target, &parked)
            .with_context(|| format!("move aside {}", target.display()))?;
        Some(parked)
    } else {
        None
    };
    if let Err(error) = fs::rename(&staged, &target) {
        if let Some(parked) = &previous {
            restore(parked, &target);
        }
        return Err(error)
            .with_context(|| format!("move {} to {}", staged.display(), target.display()));
    }
    Ok(Published {
        staged,
        target,
        previous,
    })
}

fn roll_back(published: &[Published]) {
    for entry in published.iter().rev() {
        restore(&entry.target, &entry.staged);
        if let Some(parked) = &entry.previous {
            restore(parked, &entry.target);
        }
    }
}

fn restore(from: &Path, to: &Path) {
    if let Err(error) = fs::rename(from, to) {
        warn!(
            from = %from.display(),
            to = %to.display(),
            %error,
            "could not undo table move"
        );
    }
}

/// Writes the full schema as eleven CSV files.
pub fn write_schema_csv(output_dir: &Path, schema: &NormalizedSchema) -> Result<Vec<PathBuf>> {
    let tables = schema_tables(schema)?;
    write_csv_outputs(output_dir, &tables)
}
