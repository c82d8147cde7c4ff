//! Reading cell values out of Polars frames.
//!
//! Blank and missing cells are treated the same everywhere in the pipeline:
//! both come back as `None`.

use polars::prelude::{AnyValue, Column};

/// Trims a raw cell and maps blank values to `None`.
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim().trim_matches('\u{feff}');
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Renders a scalar as trimmed text, `None` for null or blank.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use hcn_common::any_to_text;
///
/// assert_eq!(any_to_text(AnyValue::Null), None);
/// assert_eq!(any_to_text(AnyValue::Int64(42)).as_deref(), Some("42"));
/// assert_eq!(any_to_text(AnyValue::String(" West ")).as_deref(), Some("West"));
/// ```
pub fn any_to_text(value: AnyValue<'_>) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => non_blank(s).map(str::to_string),
        AnyValue::StringOwned(s) => non_blank(s.as_str()).map(str::to_string),
        other => non_blank(&other.to_string()).map(str::to_string),
    }
}

/// Reads a cell from a column as trimmed text; out-of-range reads are `None`.
pub fn text_cell(column: &Column, idx: usize) -> Option<String> {
    column.get(idx).ok().and_then(any_to_text)
}

#[cfg(test)]
mod tests {
    use polars::prelude::{IntoColumn, NamedFrom, Series};

    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(""), None);
        assert_eq!(non_blank("   "), None);
        assert_eq!(non_blank(" Lee "), Some("Lee"));
        assert_eq!(non_blank("\u{feff}patient_id"), Some("patient_id"));
    }

    #[test]
    fn test_any_to_text_integers() {
        assert_eq!(any_to_text(AnyValue::Int32(7)).as_deref(), Some("7"));
        assert_eq!(any_to_text(AnyValue::Int64(-100)).as_deref(), Some("-100"));
    }

    #[test]
    fn test_text_cell() {
        let column = Series::new("clinic_name".into(), vec![Some(" West "), None, Some("")])
            .into_column();
        assert_eq!(text_cell(&column, 0), Some("West".to_string()));
        assert_eq!(text_cell(&column, 1), None);
        assert_eq!(text_cell(&column, 2), None);
        assert_eq!(text_cell(&column, 9), None);
    }
}
