//! Error types for the normalization engine.

use polars::prelude::PolarsError;
use thiserror::Error;

use hcn_model::Dimension;

/// Fatal errors raised while building the dimensional schema.
///
/// Missing identities and inconsistent descriptive values are not errors;
/// they are counted in [`crate::BuildStats`] instead.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The fact table lost or gained rows relative to the raw input.
    #[error("fact cardinality violated: {raw_rows} raw records produced {fact_rows} fact rows")]
    FactCardinality { raw_rows: usize, fact_rows: usize },

    /// Attaching the derived status changed the patient dimension's row count.
    #[error("status merge changed DimPatient from {expected} to {actual} rows")]
    StatusMergeMismatch { expected: usize, actual: usize },

    /// A patient in the dimension has no derived status.
    #[error("no status derived for patient {patient_id}")]
    MissingStatus { patient_id: String },

    /// A stage needed a dimension that has not been built yet.
    #[error("dimension {0} has not been built")]
    MissingDimension(Dimension),

    /// Error from Polars DataFrame operations.
    #[error("dataframe error: {message}")]
    DataFrame { message: String },
}

impl From<PolarsError> for TransformError {
    fn from(err: PolarsError) -> Self {
        TransformError::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
