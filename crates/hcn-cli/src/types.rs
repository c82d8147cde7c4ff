use std::path::PathBuf;

use hcn_model::ValidationReport;

/// Outcome of one `hcn run`.
#[derive(Debug)]
pub struct RunResult {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub raw_records: usize,
    pub tables: Vec<TableSummary>,
    pub validation: Option<ValidationReport>,
    pub report_json: Option<PathBuf>,
    pub dry_run: bool,
    pub has_errors: bool,
}

#[derive(Debug)]
pub struct TableSummary {
    pub table: String,
    pub records: usize,
    /// Raw records excluded for a missing identity (dimensions only).
    pub excluded_null_identity: Option<usize>,
    /// Keys whose records disagree on descriptive values (dimensions only).
    pub inconsistent_keys: Option<usize>,
    /// Null foreign keys in `FactVisit` pointing at this table.
    pub null_foreign_keys: Option<usize>,
    /// Written file; `None` on a dry run.
    pub path: Option<PathBuf>,
}
