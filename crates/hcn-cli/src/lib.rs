//! CLI library components for the visit normalizer.

pub mod logging;
pub mod pipeline;
pub mod types;
