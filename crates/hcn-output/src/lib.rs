//! Output generation for the dimensional schema.
//!
//! - **csv**: the eleven `<Table>.csv` files, written through a staging
//!   directory and checked against the table manifests
//! - **report**: the validation report as JSON

pub mod common;
pub mod csv;
pub mod report;

pub use common::{conform_to_manifest, ensure_output_dir, ensure_parent_dir};
pub use csv::{
    OutputTable, planned_outputs, schema_tables, table_file_name, write_csv_outputs,
    write_schema_csv, write_table_csv,
};
pub use report::write_validation_report_json;
