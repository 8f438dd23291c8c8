//! Error types for schema configuration and per-field conversion.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fatal configuration errors, raised before any record is processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Bin boundaries are not strictly increasing finite numbers.
    #[error("invalid bin boundaries for field '{field}': {reason}")]
    InvalidBoundaries { field: String, reason: String },

    /// Custom bin labels do not match the number of intervals.
    #[error("field '{field}' declares {labels} bin labels for {intervals} intervals")]
    BinLabelCount {
        field: String,
        labels: usize,
        intervals: usize,
    },

    /// Bins declared on a field that never holds a number.
    #[error("field '{field}' is not numeric and cannot be binned")]
    BinsOnNonNumericField { field: String },

    /// A multi-valued field with an empty delimiter.
    #[error("multi-valued field '{field}' has an empty delimiter")]
    EmptyDelimiter { field: String },

    /// The same field name declared twice.
    #[error("field '{field}' is declared more than once")]
    DuplicateField { field: String },

    /// A unit-tagged field pointing at a unit field that is not declared.
    #[error("field '{field}' references undeclared unit field '{unit_field}'")]
    UnknownUnitField { field: String, unit_field: String },

    /// A unit table whose canonical label is missing or does not convert 1:1.
    #[error("canonical unit '{unit}' must be in the unit table with divisor 1")]
    InvalidCanonicalUnit { unit: String },

    /// A unit divisor that is zero, negative or not finite.
    #[error("unit '{unit}' has invalid divisor {divisor}")]
    InvalidUnitDivisor { unit: String, divisor: f64 },

    /// A date field without any accepted format.
    #[error("date field '{field}' declares no formats")]
    NoDateFormats { field: String },
}

/// Per-field failure converting a raw value into its declared type.
///
/// These are always recovered locally: the record is rejected with
/// `conversion_failed(field)` and the batch continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversionError {
    /// The unit label is not in the unit table.
    #[error("unknown unit '{unit}'")]
    UnknownUnit { unit: String },

    /// A magnitude is present but its unit label is missing.
    #[error("missing unit for magnitude '{value}'")]
    MissingUnit { value: String },

    /// The magnitude is not a finite number.
    #[error("invalid magnitude '{value}'")]
    InvalidMagnitude { value: String },

    /// The value matches none of the accepted date formats.
    #[error("invalid date '{value}'")]
    InvalidDate { value: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
