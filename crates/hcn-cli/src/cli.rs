//! CLI argument definitions for the visit normalizer.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use hcn_cli::pipeline::DEFAULT_OUTPUT_DIR;

#[derive(Parser)]
#[command(
    name = "hcn",
    version,
    about = "Normalize a legacy healthcare visit export into a star schema",
    long_about = "Split the flat 47-column visit CSV into ten dimension tables and \
                  a FactVisit table.\n\n\
                  Dimensions are deduplicated, surrogate keys assigned, patient \
                  activity status derived, and every fact foreign key checked \
                  against its dimension before the tables are written as CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient-level values in trace logs.
    ///
    /// Off by default; keys and attribute values are replaced with
    /// "[REDACTED]" unless this flag is given.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize a visit export and write the dimensional tables.
    Run(RunArgs),

    /// List the output tables and their columns.
    Tables(TablesArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the legacy visit CSV.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory for the table CSV files.
    #[arg(long = "output-dir", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Patients with a visit strictly after this date are Active.
    #[arg(long = "active-after", value_name = "YYYY-MM-DD")]
    pub active_after: Option<NaiveDate>,

    /// Build dimensions one at a time instead of in parallel.
    #[arg(long = "sequential")]
    pub sequential: bool,

    /// Normalize and validate without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Skip the join validation pass.
    #[arg(long = "no-validate")]
    pub no_validate: bool,

    /// Write the validation report as JSON to this path.
    #[arg(long = "report-json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,
}

#[derive(Parser)]
pub struct TablesArgs {
    /// Show only this table (e.g. DimProvider or FactVisit).
    #[arg(value_name = "TABLE")]
    pub table: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
