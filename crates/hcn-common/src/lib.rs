//! Shared utilities for the visit normalizer crates.
//!
//! This crate provides common helpers used across the workspace:
//! reading cell values out of Polars frames and redacting row-level
//! values in logs.

pub mod logging;
pub mod polars;

pub use logging::{REDACTED_VALUE, log_data_enabled, redact_value, set_log_data_enabled};
pub use polars::{any_to_text, non_blank, text_cell};
