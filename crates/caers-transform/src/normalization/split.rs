//! Multi-valued field splitting and opt-in row expansion.

use caers_model::{NormalizedRecord, NormalizedValue, Value};

/// Split a delimited value into trimmed, non-empty tokens.
///
/// `None` and blank input both yield no tokens. An empty delimiter keeps the
/// whole trimmed value as a single token.
pub fn split(raw: Option<&str>, delimiter: &str) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if delimiter.is_empty() {
        let trimmed = raw.trim();
        return if trimmed.is_empty() {
            Vec::new()
        } else {
            vec![trimmed.to_string()]
        };
    }
    raw.split(delimiter)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Split a raw cell; null cells yield no tokens.
pub fn split_value(value: Option<&Value>, delimiter: &str) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Text(text)) => split(Some(text.as_str()), delimiter),
        Some(Value::Number(number)) => split(Some(number.to_string().as_str()), delimiter),
    }
}

/// Expand records into one row per token of `field`.
///
/// Every other field is copied unchanged and input order is kept; the
/// expanded field holds the token as text. A record without tokens yields a
/// single row with the field missing, so no record disappears.
pub fn explode(records: &[NormalizedRecord], field: &str) -> Vec<NormalizedRecord> {
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let tokens = record.tokens(field);
        if tokens.is_empty() {
            let mut row = record.clone();
            row.set(field, NormalizedValue::Missing);
            rows.push(row);
            continue;
        }
        for token in tokens {
            let mut row = record.clone();
            row.set(field, NormalizedValue::Text(token.clone()));
            rows.push(row);
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use caers_model::RecordId;

    #[test]
    fn splits_and_trims() {
        assert_eq!(split(Some("A, B,  C"), ", "), vec!["A", "B", "C"]);
        assert_eq!(split(Some("A, , B, "), ", "), vec!["A", "B"]);
        assert_eq!(split(Some("A,B"), ", "), vec!["A,B"]);
    }

    #[test]
    fn empty_and_null_yield_nothing() {
        assert!(split(Some(""), ", ").is_empty());
        assert!(split(Some("   "), ", ").is_empty());
        assert!(split(None, ", ").is_empty());
    }

    #[test]
    fn split_value_handles_cells() {
        assert_eq!(split_value(Some(&Value::text("A, B, ")), ", "), vec!["A", "B"]);
        assert_eq!(split_value(Some(&Value::Number(3.0)), ", "), vec!["3"]);
        assert!(split_value(Some(&Value::Null), ", ").is_empty());
        assert!(split_value(None, ", ").is_empty());
    }

    #[test]
    fn empty_delimiter_keeps_value_whole() {
        assert_eq!(split(Some(" A, B "), ""), vec!["A, B"]);
    }

    #[test]
    fn explode_is_stable() {
        let tokens = |values: &[&str]| {
            NormalizedValue::Tokens(values.iter().map(ToString::to_string).collect())
        };
        let records = vec![
            NormalizedRecord::new(RecordId(1))
                .with("role", NormalizedValue::Text("SUSPECT".to_string()))
                .with("outcomes", tokens(&["DEATH", "HOSPITALIZATION"])),
            NormalizedRecord::new(RecordId(2))
                .with("role", NormalizedValue::Text("CONCOMITANT".to_string()))
                .with("outcomes", tokens(&[])),
            NormalizedRecord::new(RecordId(3))
                .with("role", NormalizedValue::Text("SUSPECT".to_string()))
                .with("outcomes", tokens(&["OTHER"])),
        ];
        let rows = explode(&records, "outcomes");
        let view: Vec<(usize, Option<&str>, Option<&str>)> = rows
            .iter()
            .map(|row| (row.id.0, row.text("role"), row.text("outcomes")))
            .collect();
        assert_eq!(
            view,
            vec![
                (1, Some("SUSPECT"), Some("DEATH")),
                (1, Some("SUSPECT"), Some("HOSPITALIZATION")),
                (2, Some("CONCOMITANT"), None),
                (3, Some("SUSPECT"), Some("OTHER")),
            ]
        );
        assert!(rows[2].get("outcomes").is_some_and(NormalizedValue::is_missing));
    }
}
