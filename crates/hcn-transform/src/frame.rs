//! Column construction helpers shared by the dimension and fact builders.

use polars::prelude::{Column, IntoColumn, NamedFrom, Series};

use hcn_model::{Dimension, KeyPolicy, SurrogateKey};

/// Builds a nullable text column.
pub fn text_column(name: &str, values: Vec<Option<String>>) -> Column {
    Series::new(name.into(), values).into_column()
}

/// Builds a nullable 64-bit integer column.
pub fn integer_column(name: &str, values: Vec<Option<i64>>) -> Column {
    Series::new(name.into(), values).into_column()
}

/// Builds the surrogate-key column of `dimension` with its declared type.
///
/// Reused keys become text, generated keys `Int64`. A key of the other
/// policy is written as null rather than coerced.
pub fn surrogate_column(
    dimension: Dimension,
    name: &str,
    keys: &[Option<&SurrogateKey>],
) -> Column {
    match dimension.policy() {
        KeyPolicy::Reused => text_column(
            name,
            keys.iter()
                .map(|key| key.and_then(SurrogateKey::as_natural).map(str::to_string))
                .collect(),
        ),
        KeyPolicy::Generated => integer_column(
            name,
            keys.iter()
                .map(|key| key.and_then(SurrogateKey::as_generated))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use polars::prelude::DataType;

    use super::*;

    #[test]
    fn test_surrogate_column_types() {
        let generated = SurrogateKey::Generated(3);
        let column =
            surrogate_column(Dimension::Provider, "provider_id", &[Some(&generated), None]);
        assert_eq!(column.dtype(), &DataType::Int64);
        assert_eq!(column.null_count(), 1);

        let natural = SurrogateKey::Natural("P1".to_string());
        let column = surrogate_column(Dimension::Patient, "patient_id", &[Some(&natural)]);
        assert_eq!(column.dtype(), &DataType::String);
        assert_eq!(column.str().unwrap().get(0), Some("P1"));
    }
}
