//! Rejection reasons and the per-batch rejection report.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConversionError;
use crate::record::RecordId;

/// Why a record was excluded from the normalized output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    /// A required field is absent, blank or a null sentinel.
    MissingRequiredField {
        field: String,
        /// The offending raw value, `None` when the field was absent or null.
        value: Option<String>,
    },
    /// Every trimmed field value equals an earlier record's.
    DuplicateOf { original: RecordId },
    /// A field could not be converted to its declared type.
    ConversionFailed {
        field: String,
        error: ConversionError,
    },
}

impl RejectionReason {
    /// Stable reason code without arguments.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingRequiredField { .. } => "missing_required_field",
            Self::DuplicateOf { .. } => "duplicate_of",
            Self::ConversionFailed { .. } => "conversion_failed",
        }
    }

    /// The field the decision was made on; duplicates have none.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MissingRequiredField { field, .. } | Self::ConversionFailed { field, .. } => {
                Some(field)
            }
            Self::DuplicateOf { .. } => None,
        }
    }

    /// Human-readable detail, enough to reproduce the decision.
    pub fn detail(&self) -> String {
        match self {
            Self::MissingRequiredField { field, value } => match value {
                Some(value) => format!("field '{field}' has no usable value: '{value}'"),
                None => format!("field '{field}' is absent or empty"),
            },
            Self::DuplicateOf { original } => format!("same values as record {original}"),
            Self::ConversionFailed { field, error } => format!("field '{field}': {error}"),
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequiredField { .. } => f.write_str("missing_required_field"),
            Self::DuplicateOf { original } => write!(f, "duplicate_of({original})"),
            Self::ConversionFailed { field, .. } => write!(f, "conversion_failed({field})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub record: RecordId,
    #[serde(flatten)]
    pub reason: RejectionReason,
}

/// Every record dropped during one normalization pass, ordered by record identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RejectionReport {
    entries: Vec<Rejection>,
}

impl RejectionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: RecordId, reason: RejectionReason) {
        self.entries.push(Rejection { record, reason });
    }

    /// Appends another report and restores record order.
    pub fn merge(&mut self, other: RejectionReport) {
        self.entries.extend(other.entries);
        self.entries.sort_by_key(|entry| entry.record);
    }

    pub fn entries(&self) -> &[Rejection] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reason_for(&self, record: RecordId) -> Option<&RejectionReason> {
        self.entries
            .iter()
            .find(|entry| entry.record == record)
            .map(|entry| &entry.reason)
    }

    /// Number of rejections per reason code.
    pub fn counts_by_code(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.reason.code()).or_insert(0) += 1;
        }
        counts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rejection> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a RejectionReport {
    type Item = &'a Rejection;
    type IntoIter = std::slice::Iter<'a, Rejection>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
