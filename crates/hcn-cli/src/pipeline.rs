//! Batch pipeline stages: ingest, normalize, validate, output.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use hcn_ingest::load_raw_dataset;
use hcn_model::FACT_TABLE;
use hcn_output::{table_file_name, write_schema_csv, write_validation_report_json};
use hcn_transform::{NormalizeOptions, NormalizedSchema, normalize};
use hcn_validate::validate_schema;

use crate::types::{RunResult, TableSummary};

/// Default output directory of the batch job.
pub const DEFAULT_OUTPUT_DIR: &str = "data/answers";

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub options: NormalizeOptions,
    /// Build and validate without writing tables.
    pub dry_run: bool,
    pub validate: bool,
    pub report_json: Option<PathBuf>,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            options: NormalizeOptions::default(),
            dry_run: false,
            validate: true,
            report_json: None,
        }
    }

    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    #[must_use]
    pub fn with_report_json(mut self, path: Option<PathBuf>) -> Self {
        self.report_json = path;
        self
    }
}

/// Runs the whole batch: load, normalize, validate, write.
///
/// Tables are only written after normalization (and validation, when
/// enabled) finished, and then all eleven at once.
pub fn run_pipeline(config: &RunConfig) -> Result<RunResult> {
    let run_span = info_span!("run", input = %config.input.display());
    let _run_guard = run_span.enter();
    let start = Instant::now();

    let raw = load_raw_dataset(&config.input)
        .with_context(|| format!("load {}", config.input.display()))?;
    let schema = normalize(&raw, config.options).context("normalize visits")?;

    let validation = if config.validate {
        Some(validate_schema(&schema, &raw).context("validate schema")?)
    } else {
        None
    };

    let written = if config.dry_run {
        info!(output_dir = %config.output_dir.display(), "dry run, no tables written");
        None
    } else {
        Some(write_schema_csv(&config.output_dir, &schema).context("write tables")?)
    };

    let mut report_json = None;
    if let (Some(path), Some(report)) = (&config.report_json, &validation) {
        write_validation_report_json(path, report)?;
        report_json = Some(path.clone());
    } else if config.report_json.is_some() {
        warn!("validation disabled, no report written");
    }

    let has_errors = validation
        .as_ref()
        .is_some_and(hcn_model::ValidationReport::has_errors);
    let tables = summarize_tables(&schema, &config.output_dir, written.is_some());
    info!(
        records = raw.height(),
        tables = tables.len(),
        has_errors,
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );

    Ok(RunResult {
        input: config.input.clone(),
        output_dir: config.output_dir.clone(),
        raw_records: raw.height(),
        tables,
        validation,
        report_json,
        dry_run: config.dry_run,
        has_errors,
    })
}

fn summarize_tables(
    schema: &NormalizedSchema,
    output_dir: &Path,
    written: bool,
) -> Vec<TableSummary> {
    let mut tables: Vec<TableSummary> = schema
        .dimensions
        .values()
        .map(|table| TableSummary {
            table: table.table_name().to_string(),
            records: table.row_count(),
            excluded_null_identity: Some(table.stats.excluded_null_identity),
            inconsistent_keys: Some(table.stats.inconsistent_keys),
            null_foreign_keys: Some(schema.fact.null_foreign_keys_for(table.dimension)),
            path: None,
        })
        .collect();
    tables.push(TableSummary {
        table: FACT_TABLE.to_string(),
        records: schema.fact.row_count(),
        excluded_null_identity: None,
        inconsistent_keys: None,
        null_foreign_keys: None,
        path: None,
    });
    if written {
        for summary in &mut tables {
            summary.path = Some(output_dir.join(table_file_name(&summary.table)));
        }
    }
    tables
}

