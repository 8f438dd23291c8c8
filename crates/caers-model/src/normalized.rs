//! Typed output records of the normalization pipeline.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::bins::BinLabel;
use crate::field::FieldKind;
use crate::record::{RawRecord, RecordId, Value};
use crate::schema::Schema;

/// Fallback used when rendering a date or token list for an undeclared field.
const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";
const FALLBACK_DELIMITER: &str = ", ";

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedValue {
    Missing,
    Number(f64),
    Text(String),
    Tokens(Vec<String>),
    Date(NaiveDate),
}

impl NormalizedValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            _ => None,
        }
    }

    pub fn as_tokens(&self) -> Option<&[String]> {
        match self {
            Self::Tokens(tokens) => Some(tokens),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }

    /// Single-value rendering used for grouping keys; token lists and
    /// missing values have none.
    pub fn key(&self) -> Option<String> {
        match self {
            Self::Missing | Self::Tokens(_) => None,
            Self::Number(number) => Some(number.to_string()),
            Self::Text(text) => Some(text.clone()),
            Self::Date(date) => Some(date.format(FALLBACK_DATE_FORMAT).to_string()),
        }
    }
}

/// A record that passed every pipeline stage.
///
/// Keeps the identity and field order of its source record. Required fields
/// are never [`NormalizedValue::Missing`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    pub id: RecordId,
    fields: Vec<(String, NormalizedValue)>,
    bins: BTreeMap<String, BinLabel>,
}

impl NormalizedRecord {
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            fields: Vec::new(),
            bins: BTreeMap::new(),
        }
    }

    /// Sets a field, replacing in place or appending.
    pub fn set(&mut self, name: impl Into<String>, value: NormalizedValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: NormalizedValue) -> Self {
        self.set(name, value);
        self
    }

    pub fn set_bin(&mut self, name: impl Into<String>, label: BinLabel) {
        self.bins.insert(name.into(), label);
    }

    pub fn get(&self, name: &str) -> Option<&NormalizedValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(NormalizedValue::as_text)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(NormalizedValue::as_number)
    }

    /// Tokens of a multi-valued field; empty when absent.
    pub fn tokens(&self, name: &str) -> &[String] {
        self.get(name)
            .and_then(NormalizedValue::as_tokens)
            .unwrap_or(&[])
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        self.get(name).and_then(NormalizedValue::as_date)
    }

    pub fn bin(&self, name: &str) -> Option<&BinLabel> {
        self.bins.get(name)
    }

    pub fn bins(&self) -> &BTreeMap<String, BinLabel> {
        &self.bins
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &NormalizedValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Converts back into an untyped record that normalizes to `self` again.
    ///
    /// Token lists are joined with their field's delimiter and dates are
    /// rendered with the field's first format.
    pub fn to_raw(&self, schema: &Schema) -> RawRecord {
        let mut raw = RawRecord::new(self.id);
        for (name, value) in &self.fields {
            let kind = schema.field(name).map(|spec| &spec.kind);
            let cell = match value {
                NormalizedValue::Missing => Value::Null,
                NormalizedValue::Number(number) => Value::Number(*number),
                NormalizedValue::Text(text) => Value::Text(text.clone()),
                NormalizedValue::Tokens(tokens) => {
                    let delimiter = match kind {
                        Some(FieldKind::MultiValued { delimiter }) => delimiter.as_str(),
                        _ => FALLBACK_DELIMITER,
                    };
                    Value::Text(tokens.join(delimiter))
                }
                NormalizedValue::Date(date) => {
                    let format = match kind {
                        Some(FieldKind::Date { formats }) => formats
                            .first()
                            .map_or(FALLBACK_DATE_FORMAT, String::as_str),
                        _ => FALLBACK_DATE_FORMAT,
                    };
                    Value::Text(date.format(format).to_string())
                }
            };
            raw.set(name.clone(), cell);
        }
        raw
    }
}

struct FieldMap<'a>(&'a [(String, NormalizedValue)]);

impl Serialize for FieldMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("id", &self.id)?;
        map.serialize_entry("fields", &FieldMap(&self.fields))?;
        map.serialize_entry("bins", &self.bins)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldSpec;
    use crate::units::UnitTable;

    fn schema() -> Schema {
        Schema::new(
            vec![
                FieldSpec::multi_valued("tags", "; "),
                FieldSpec::date("when"),
            ],
            UnitTable::ages(),
        )
        .unwrap()
    }

    #[test]
    fn to_raw_renders_tokens_and_dates() {
        let date = NaiveDate::from_ymd_opt(2014, 4, 24).unwrap();
        let record = NormalizedRecord::new(RecordId(3))
            .with(
                "tags",
                NormalizedValue::Tokens(vec!["a".to_string(), "b".to_string()]),
            )
            .with("when", NormalizedValue::Date(date))
            .with("other", NormalizedValue::Missing);
        let raw = record.to_raw(&schema());
        assert_eq!(raw.id, RecordId(3));
        assert_eq!(raw.get("tags"), Some(&Value::text("a; b")));
        assert_eq!(raw.get("when"), Some(&Value::text("04/24/2014")));
        assert_eq!(raw.get("other"), Some(&Value::Null));
    }

    #[test]
    fn serializes_fields_in_order() {
        let record = NormalizedRecord::new(RecordId(1))
            .with("b", NormalizedValue::Number(2.5))
            .with("a", NormalizedValue::Text("x".to_string()));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"id":1,"fields":{"b":2.5,"a":"x"},"bins":{}}"#);
    }
}
