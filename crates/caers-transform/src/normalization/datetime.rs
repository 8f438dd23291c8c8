//! Calendar date parsing.

use chrono::NaiveDate;

use caers_model::{ConversionError, Value};

/// Parse a date cell against `formats`, first match wins.
pub fn parse_date(value: &Value, formats: &[String]) -> Result<NaiveDate, ConversionError> {
    let invalid = || ConversionError::InvalidDate {
        value: value.to_string(),
    };
    let text = value.as_text().map(str::trim).ok_or_else(invalid)?;
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caers_model::default_date_formats;

    #[test]
    fn parses_caers_and_iso_dates() {
        let formats = default_date_formats();
        let expected = NaiveDate::from_ymd_opt(2014, 4, 24).unwrap();
        assert_eq!(parse_date(&Value::text("04/24/2014"), &formats), Ok(expected));
        assert_eq!(parse_date(&Value::text(" 2014-04-24 "), &formats), Ok(expected));
    }

    #[test]
    fn rejects_unparsable_dates() {
        let formats = default_date_formats();
        assert_eq!(
            parse_date(&Value::text("24.04.2014"), &formats),
            Err(ConversionError::InvalidDate {
                value: "24.04.2014".to_string()
            })
        );
        assert!(parse_date(&Value::text("02/30/2014"), &formats).is_err());
        assert!(parse_date(&Value::Number(20140424.0), &formats).is_err());
    }
}
