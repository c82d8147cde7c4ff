//! CSV reading utilities.

mod header;
mod reader;

pub use header::{CsvHeaders, normalize_header, read_csv_headers};
pub use reader::read_csv_frame;
