//! Missing-field and duplicate filtering.

use std::collections::BTreeMap;

use tracing::debug;

use caers_model::{FieldKind, RawRecord, RecordId, RejectionReason, RejectionReport, Schema, Value};

use crate::normalization::{convert_tagged, parse_date, split_value, to_number};

/// Records that survived filtering, in input order, plus the rejections.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome<'a> {
    pub kept: Vec<&'a RawRecord>,
    pub rejected: RejectionReport,
}

/// One field's contribution to the duplicate key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum KeyValue {
    Text(String),
    Tokens(Vec<String>),
}

/// Equality key: every present field in canonical form, ordered by field
/// name. Missing and absent fields are left out so all spellings of
/// "missing" agree.
type DedupeKey = Vec<(String, KeyValue)>;

/// Drop records missing a required field, then duplicates.
///
/// Two records are duplicates when every field agrees after
/// normalization: magnitudes in the canonical unit (with the canonical unit
/// label), parsed numbers and dates, split token lists, and trimmed text
/// for everything else. Values that fail to convert compare as trimmed
/// text. Records equal as trimmed text are always duplicates.
///
/// The first occurrence of a duplicate group is kept; later ones are
/// rejected as `duplicate_of(first)`. Incomplete records are rejected before
/// duplicate detection and never anchor a duplicate group. Never fails.
pub fn filter_records<'a>(records: &'a [RawRecord], schema: &Schema) -> FilterOutcome<'a> {
    let mut outcome = FilterOutcome {
        kept: Vec::with_capacity(records.len()),
        rejected: RejectionReport::new(),
    };
    let mut seen: BTreeMap<DedupeKey, RecordId> = BTreeMap::new();
    for record in records {
        if let Some(reason) = missing_required_field(record, schema) {
            outcome.rejected.push(record.id, reason);
            continue;
        }
        let key = dedupe_key(record, schema);
        if let Some(original) = seen.get(&key) {
            outcome.rejected.push(
                record.id,
                RejectionReason::DuplicateOf {
                    original: *original,
                },
            );
            continue;
        }
        seen.insert(key, record.id);
        outcome.kept.push(record);
    }
    debug!(
        input = records.len(),
        kept = outcome.kept.len(),
        rejected = outcome.rejected.len(),
        "filter complete"
    );
    outcome
}

/// First required field (in schema order) that is missing, if any.
///
/// A multi-valued field that splits into no tokens (for example `", , "`)
/// counts as missing.
pub fn missing_required_field(record: &RawRecord, schema: &Schema) -> Option<RejectionReason> {
    for spec in schema.required_fields() {
        let value = record.get(&spec.name);
        let missing = schema.is_missing(value)
            || match &spec.kind {
                FieldKind::MultiValued { delimiter } => {
                    split_value(value, delimiter).is_empty()
                }
                _ => false,
            };
        if missing {
            return Some(RejectionReason::MissingRequiredField {
                field: spec.name.clone(),
                value: value
                    .and_then(Value::trimmed)
                    .filter(|text| !text.is_empty()),
            });
        }
    }
    None
}

fn dedupe_key(record: &RawRecord, schema: &Schema) -> DedupeKey {
    let mut key: BTreeMap<String, KeyValue> = record
        .fields()
        .filter(|(_, value)| !schema.is_missing(Some(value)))
        .filter_map(|(name, value)| Some((name.to_string(), KeyValue::Text(value.trimmed()?))))
        .collect();
    for spec in schema.fields() {
        let Some(value) = record
            .get(&spec.name)
            .filter(|value| !schema.is_missing(Some(value)))
        else {
            continue;
        };
        match &spec.kind {
            FieldKind::UnitTagged { unit_field } => {
                if let Ok(canonical) = convert_tagged(value, record.get(unit_field), schema) {
                    key.insert(spec.name.clone(), KeyValue::Text(canonical.to_string()));
                    key.insert(
                        unit_field.clone(),
                        KeyValue::Text(schema.units().canonical().to_string()),
                    );
                }
            }
            FieldKind::Numeric => {
                if let Ok(number) = to_number(value) {
                    key.insert(spec.name.clone(), KeyValue::Text(number.to_string()));
                }
            }
            FieldKind::Date { formats } => {
                if let Ok(date) = parse_date(value, formats) {
                    key.insert(spec.name.clone(), KeyValue::Text(date.to_string()));
                }
            }
            FieldKind::MultiValued { delimiter } => {
                let tokens = split_value(Some(value), delimiter);
                if tokens.is_empty() {
                    key.remove(&spec.name);
                } else {
                    key.insert(spec.name.clone(), KeyValue::Tokens(tokens));
                }
            }
            FieldKind::Categorical => {}
        }
    }
    key.into_iter().collect()
}
