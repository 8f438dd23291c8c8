//! Unit conversion into a table's canonical unit.

use caers_model::{ConversionError, Schema, UnitTable, Value};

use super::numeric::to_number;

/// Convert `value` expressed in `unit` into the table's canonical unit.
///
/// Fails with `UnknownUnit` when the label is not in the table; there is no
/// fallback divisor. Non-finite magnitudes fail with `InvalidMagnitude`.
pub fn convert(value: f64, unit: &str, table: &UnitTable) -> Result<f64, ConversionError> {
    if !value.is_finite() {
        return Err(ConversionError::InvalidMagnitude {
            value: value.to_string(),
        });
    }
    let divisor = table
        .divisor(unit)
        .ok_or_else(|| ConversionError::UnknownUnit {
            unit: unit.trim().to_string(),
        })?;
    Ok(value / divisor)
}

/// Convert a raw magnitude cell (number or numeric text).
///
/// The unit is checked before the magnitude so a record with both problems
/// reports the unit.
pub fn convert_value(
    magnitude: &Value,
    unit: &str,
    table: &UnitTable,
) -> Result<f64, ConversionError> {
    if !table.contains(unit) {
        return Err(ConversionError::UnknownUnit {
            unit: unit.trim().to_string(),
        });
    }
    convert(to_number(magnitude)?, unit, table)
}

/// Convert a magnitude whose unit label lives in a separate cell.
///
/// A missing label (absent, blank or a null sentinel) fails with
/// `MissingUnit`; labels are trimmed before lookup.
pub fn convert_tagged(
    magnitude: &Value,
    unit: Option<&Value>,
    schema: &Schema,
) -> Result<f64, ConversionError> {
    let Some(unit) = unit
        .filter(|unit| !schema.is_missing(Some(unit)))
        .and_then(Value::trimmed)
    else {
        return Err(ConversionError::MissingUnit {
            value: magnitude.to_string(),
        });
    };
    convert_value(magnitude, &unit, schema.units())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_known_units_to_years() {
        let table = UnitTable::ages();
        assert_eq!(convert(30.0, "Year(s)", &table), Ok(30.0));
        assert_eq!(convert(18.0, "Month(s)", &table), Ok(1.5));
        assert_eq!(convert(26.0, "Week(s)", &table), Ok(0.5));
        assert_eq!(convert(730.0, "Day(s)", &table), Ok(2.0));
    }

    #[test]
    fn unknown_unit_is_an_error() {
        let table = UnitTable::ages();
        assert_eq!(
            convert(3.0, "Fortnight(s)", &table),
            Err(ConversionError::UnknownUnit {
                unit: "Fortnight(s)".to_string()
            })
        );
    }

    #[test]
    fn convert_value_parses_text() {
        let table = UnitTable::ages();
        assert_eq!(convert_value(&Value::text(" 24 "), "Month(s)", &table), Ok(2.0));
        assert_eq!(
            convert_value(&Value::text("twenty"), "Month(s)", &table),
            Err(ConversionError::InvalidMagnitude {
                value: "twenty".to_string()
            })
        );
        assert!(matches!(
            convert_value(&Value::text("twenty"), "Decade(s)", &table),
            Err(ConversionError::UnknownUnit { .. })
        ));
    }

    #[test]
    fn convert_tagged_needs_a_label() {
        let schema = Schema::caers();
        let magnitude = Value::text("104");
        assert_eq!(
            convert_tagged(&magnitude, Some(&Value::text(" Week(s) ")), &schema),
            Ok(2.0)
        );
        for unit in [None, Some(Value::Null), Some(Value::text("N/A"))] {
            assert_eq!(
                convert_tagged(&magnitude, unit.as_ref(), &schema),
                Err(ConversionError::MissingUnit {
                    value: "104".to_string()
                })
            );
        }
    }
}
