//! Numeric parsing for magnitude and numeric fields.
//!
//! Values are treated as exact 64-bit floats. Text is never coerced
//! silently: anything that does not parse to a finite number is an
//! `InvalidMagnitude`.

use caers_model::{ConversionError, Value};

/// Parse a string value to a finite `f64`.
///
/// Handles common numeric formats:
/// - Standard numbers: "123", "-45.67"
/// - Thousands separators: "1,234,567" (groups of exactly three digits)
/// - Surrounding whitespace: "  123  ", including non-breaking spaces
/// - Scientific notation: "1.23e5"
///
/// Returns None for empty input, unparsable input, and non-finite values
/// such as "inf" or "NaN". Decimal commas ("3,5"), misplaced separators
/// ("12,34") and inner whitespace ("1 2") are unparsable, never rewritten.
pub fn parse_numeric(value: &str) -> Option<f64> {
    let trimmed = value.trim();

    if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
        return None;
    }

    strip_thousands(trimmed)?
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Remove thousands separators from the integer part.
///
/// The first group has one to three digits and every later group exactly
/// three; commas anywhere else make the value unparsable.
fn strip_thousands(text: &str) -> Option<String> {
    if !text.contains(',') {
        return Some(text.to_string());
    }
    let unsigned = text.trim_start_matches(['+', '-']);
    let sign = &text[..text.len() - unsigned.len()];
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit() && c != ',')
        .unwrap_or(unsigned.len());
    let (integer, rest) = unsigned.split_at(end);
    if rest.contains(',') {
        return None;
    }
    let mut groups = integer.split(',');
    let first = groups.next()?;
    if first.is_empty() || first.len() > 3 || !groups.all(|group| group.len() == 3) {
        return None;
    }
    Some(format!("{sign}{}{rest}", integer.replace(',', "")))
}

/// Convert a raw cell to a finite number.
pub fn to_number(value: &Value) -> Result<f64, ConversionError> {
    match value {
        Value::Number(number) if number.is_finite() => Ok(*number),
        Value::Text(text) => parse_numeric(text).ok_or_else(|| invalid(value)),
        _ => Err(invalid(value)),
    }
}

fn invalid(value: &Value) -> ConversionError {
    ConversionError::InvalidMagnitude {
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_integer() {
        assert_eq!(parse_numeric("123"), Some(123.0));
        assert_eq!(parse_numeric("-456"), Some(-456.0));
    }

    #[test]
    fn test_decimal() {
        assert_eq!(parse_numeric("123.45"), Some(123.45));
        assert_eq!(parse_numeric("-0.5"), Some(-0.5));
    }

    #[test]
    fn test_thousands_separator() {
        assert_eq!(parse_numeric("1,234,567"), Some(1234567.0));
        assert_eq!(parse_numeric("1,234.56"), Some(1234.56));
    }

    #[test]
    fn test_malformed_separators_rejected() {
        assert_eq!(parse_numeric("3,5"), None);
        assert_eq!(parse_numeric("12,34"), None);
        assert_eq!(parse_numeric("1,,,2"), None);
        assert_eq!(parse_numeric("1234,567"), None);
        assert_eq!(parse_numeric(",123"), None);
        assert_eq!(parse_numeric("1.5,000"), None);
        assert_eq!(parse_numeric("-1,000"), Some(-1000.0));
    }

    #[test]
    fn test_inner_whitespace_rejected() {
        assert_eq!(parse_numeric("1 2"), None);
        assert_eq!(parse_numeric("1\u{a0}000"), None);
        assert_eq!(parse_numeric("- 5"), None);
    }

    #[test]
    fn test_whitespace() {
        assert_eq!(parse_numeric("  123  "), Some(123.0));
        assert_eq!(parse_numeric("\u{a0}45"), Some(45.0));
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(parse_numeric("1.23e5"), Some(123000.0));
        assert_eq!(parse_numeric("1.5E-3"), Some(0.0015));
    }

    #[test]
    fn test_empty_and_invalid() {
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("  "), None);
        assert_eq!(parse_numeric("abc"), None);
        assert_eq!(parse_numeric("12.34.56"), None);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert_eq!(parse_numeric("nan"), None);
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric("-infinity"), None);
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&Value::Number(4.0)), Ok(4.0));
        assert_eq!(to_number(&Value::text("4.5")), Ok(4.5));
        assert_eq!(
            to_number(&Value::text("four")),
            Err(ConversionError::InvalidMagnitude {
                value: "four".to_string()
            })
        );
        for malformed in ["3,5", "1 2", "12,34"] {
            assert_eq!(
                to_number(&Value::text(malformed)),
                Err(ConversionError::InvalidMagnitude {
                    value: malformed.to_string()
                })
            );
        }
        assert!(to_number(&Value::Number(f64::INFINITY)).is_err());
        assert!(to_number(&Value::Null).is_err());
    }
}
