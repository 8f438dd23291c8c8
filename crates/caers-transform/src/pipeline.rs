//! Batch normalization: filter, convert, split and bin.
//!
//! # Stage order
//!
//! 1. **Declared fields** - optional check that every declared field occurs in the batch
//! 2. **Filter** - missing required fields, then duplicates in canonical form
//! 3. **Convert** - unit-tagged, numeric and date fields, in schema order
//! 4. **Split** - multi-valued fields into tokens
//! 5. **Bin** - attach a label for every binned field
//!
//! Only the conversion stage can reject a record after filtering. A record
//! is rejected at most once; the first failing stage wins.

use serde::Serialize;
use tracing::{debug, info, info_span};

use caers_model::{
    ConversionError, FieldKind, NormalizedRecord, NormalizedValue, RawRecord, RejectionReason,
    RejectionReport, Schema, SchemaConfig, Value,
};

use crate::error::{PipelineError, Result};
use crate::filter::filter_records;
use crate::normalization::{classify, convert_tagged, parse_date, split_value, to_number};

/// Output of one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Normalized {
    /// Surviving records in input order.
    pub records: Vec<NormalizedRecord>,
    pub rejections: RejectionReport,
    #[serde(skip)]
    pub input_count: usize,
}

impl Normalized {
    pub fn kept(&self) -> usize {
        self.records.len()
    }

    pub fn rejected(&self) -> usize {
        self.rejections.len()
    }
}

/// Normalizes batches against one validated schema.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    schema: Schema,
}

impl Normalizer {
    pub fn new(schema: Schema) -> Self {
        Self { schema }
    }

    /// Validates a serde schema before any record is seen.
    pub fn from_config(config: SchemaConfig) -> Result<Self> {
        Ok(Self::new(Schema::try_from(config)?))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn normalize(&self, records: &[RawRecord]) -> Result<Normalized> {
        normalize(records, &self.schema)
    }
}

/// Normalize `records` against `schema`.
///
/// Fails only on batch-level configuration problems; every per-record
/// problem becomes a rejection.
pub fn normalize(records: &[RawRecord], schema: &Schema) -> Result<Normalized> {
    let span = info_span!("normalize", input = records.len());
    let _guard = span.enter();

    if schema.require_declared_fields() {
        check_declared_fields(records, schema)?;
    }

    let filtered = filter_records(records, schema);
    let mut rejections = filtered.rejected;
    let mut conversions = RejectionReport::new();
    let mut normalized = Vec::with_capacity(filtered.kept.len());
    for record in filtered.kept {
        match normalize_record(record, schema) {
            Ok(clean) => normalized.push(clean),
            Err(reason) => conversions.push(record.id, reason),
        }
    }
    rejections.merge(conversions);

    for rejection in &rejections {
        debug!(record = %rejection.record, reason = %rejection.reason, "record rejected");
    }
    info!(
        input = records.len(),
        kept = normalized.len(),
        rejected = rejections.len(),
        "normalization complete"
    );

    Ok(Normalized {
        records: normalized,
        rejections,
        input_count: records.len(),
    })
}

fn check_declared_fields(records: &[RawRecord], schema: &Schema) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    for spec in schema.fields() {
        if !records.iter().any(|record| record.contains(&spec.name)) {
            return Err(PipelineError::FieldNeverSeen {
                field: spec.name.clone(),
            });
        }
    }
    Ok(())
}

fn normalize_record(
    record: &RawRecord,
    schema: &Schema,
) -> std::result::Result<NormalizedRecord, RejectionReason> {
    let mut out = carry_fields(record, schema);
    convert_fields(record, schema, &mut out)?;
    split_fields(record, schema, &mut out);
    bin_fields(schema, &mut out);
    Ok(out)
}

/// Copy every field in record order. Categorical and undeclared values are
/// trimmed; typed fields hold `Missing` until their stage fills them.
fn carry_fields(record: &RawRecord, schema: &Schema) -> NormalizedRecord {
    let mut out = NormalizedRecord::new(record.id);
    for (name, value) in record.fields() {
        let kind = schema.field(name).map(|spec| &spec.kind);
        let carried = if schema.is_missing(Some(value)) {
            NormalizedValue::Missing
        } else {
            match (kind, value) {
                (None, Value::Number(number)) => NormalizedValue::Number(*number),
                (None | Some(FieldKind::Categorical), _) => {
                    value.trimmed().map_or(NormalizedValue::Missing, NormalizedValue::Text)
                }
                _ => NormalizedValue::Missing,
            }
        };
        out.set(name, carried);
    }
    for spec in schema.fields() {
        if out.get(&spec.name).is_none() {
            out.set(spec.name.clone(), NormalizedValue::Missing);
        }
    }
    out
}

fn convert_fields(
    record: &RawRecord,
    schema: &Schema,
    out: &mut NormalizedRecord,
) -> std::result::Result<(), RejectionReason> {
    for spec in schema.fields() {
        let value = record.get(&spec.name);
        if schema.is_missing(value) {
            continue;
        }
        let Some(value) = value else {
            continue;
        };
        let failed = |error: ConversionError| RejectionReason::ConversionFailed {
            field: spec.name.clone(),
            error,
        };
        match &spec.kind {
            FieldKind::UnitTagged { unit_field } => {
                let canonical =
                    convert_tagged(value, record.get(unit_field), schema).map_err(failed)?;
                out.set(spec.name.clone(), NormalizedValue::Number(canonical));
                out.set(
                    unit_field.clone(),
                    NormalizedValue::Text(schema.units().canonical().to_string()),
                );
            }
            FieldKind::Numeric => {
                let number = to_number(value).map_err(failed)?;
                out.set(spec.name.clone(), NormalizedValue::Number(number));
            }
            FieldKind::Date { formats } => {
                let date = parse_date(value, formats).map_err(failed)?;
                out.set(spec.name.clone(), NormalizedValue::Date(date));
            }
            FieldKind::Categorical | FieldKind::MultiValued { .. } => {}
        }
    }
    Ok(())
}

fn split_fields(record: &RawRecord, schema: &Schema, out: &mut NormalizedRecord) {
    for spec in schema.fields() {
        let FieldKind::MultiValued { delimiter } = &spec.kind else {
            continue;
        };
        let value = record.get(&spec.name);
        if schema.is_missing(value) {
            continue;
        }
        let tokens = split_value(value, delimiter);
        let normalized = if tokens.is_empty() {
            NormalizedValue::Missing
        } else {
            NormalizedValue::Tokens(tokens)
        };
        out.set(spec.name.clone(), normalized);
    }
}

fn bin_fields(schema: &Schema, out: &mut NormalizedRecord) {
    for spec in schema.fields() {
        if let Some(bins) = &spec.bins {
            let label = classify(out.number(&spec.name), bins);
            out.set_bin(spec.name.clone(), label);
        }
    }
}
