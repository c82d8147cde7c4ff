use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a dimension entity, derived from raw columns.
///
/// Ordering is lexicographic over the components; generated surrogate keys are
/// numbered in this order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum DerivationKey {
    /// A single natural identifier value.
    Natural(String),
    /// Values of the identity columns, in declared column order.
    Composite(Vec<String>),
}

impl DerivationKey {
    /// Key components in identity column order.
    pub fn parts(&self) -> Vec<&str> {
        match self {
            Self::Natural(value) => vec![value.as_str()],
            Self::Composite(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for DerivationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Natural(value) => f.write_str(value),
            Self::Composite(values) => write!(f, "({})", values.join(", ")),
        }
    }
}

/// Surrogate key of a dimension row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SurrogateKey {
    /// Reused natural identifier.
    Natural(String),
    /// Run-generated dense integer, starting at 1.
    Generated(i64),
}

impl SurrogateKey {
    pub fn as_natural(&self) -> Option<&str> {
        match self {
            Self::Natural(value) => Some(value),
            Self::Generated(_) => None,
        }
    }

    pub fn as_generated(&self) -> Option<i64> {
        match self {
            Self::Generated(value) => Some(*value),
            Self::Natural(_) => None,
        }
    }
}

impl fmt::Display for SurrogateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Natural(value) => f.write_str(value),
            Self::Generated(value) => write!(f, "{value}"),
        }
    }
}
