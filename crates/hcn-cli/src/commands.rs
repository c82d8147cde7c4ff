use anyhow::{Context, Result};
use comfy_table::Table;

use hcn_cli::pipeline::{RunConfig, run_pipeline};
use hcn_cli::types::RunResult;
use hcn_model::{ColumnSpec, output_manifests, table_manifest};
use hcn_transform::NormalizeOptions;

use crate::cli::{RunArgs, TablesArgs};
use crate::summary::apply_table_style;

pub fn run_tables(args: &TablesArgs) -> Result<()> {
    let manifests = match &args.table {
        Some(name) => vec![table_manifest(name).context("look up table")?],
        None => output_manifests(),
    };
    let mut table = Table::new();
    table.set_header(vec!["Table", "Version", "Columns"]);
    apply_table_style(&mut table);
    for manifest in manifests {
        let columns = manifest
            .columns
            .iter()
            .map(column_label)
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            manifest.name.clone(),
            manifest.version.to_string(),
            columns,
        ]);
    }
    println!("{table}");
    Ok(())
}

pub fn run_normalize(args: &RunArgs) -> Result<RunResult> {
    let mut options = NormalizeOptions::default().with_parallel(!args.sequential);
    if let Some(cutoff) = args.active_after {
        options = options.with_activity_cutoff(cutoff);
    }
    let config = RunConfig::new(&args.input)
        .with_output_dir(&args.output_dir)
        .with_options(options)
        .with_dry_run(args.dry_run)
        .with_validation(!args.no_validate)
        .with_report_json(args.report_json.clone());
    run_pipeline(&config)
}

fn column_label(column: &ColumnSpec) -> String {
    let nullable = if column.nullable { "?" } else { "" };
    format!("{}: {}{nullable}", column.name, column.column_type.label())
}
