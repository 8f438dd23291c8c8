//! Data model for CAERS record normalization.
//!
//! Raw records come in untyped ([`RawRecord`]), are checked against a
//! validated [`Schema`], and leave as [`NormalizedRecord`]s together with a
//! [`RejectionReport`] explaining every record that was dropped.

pub mod bins;
pub mod error;
pub mod field;
pub mod normalized;
pub mod record;
pub mod rejection;
pub mod schema;
pub mod units;

pub use bins::{BinLabel, Bins, BinsError};
pub use error::{ConfigError, ConversionError, Result};
pub use field::{DEFAULT_DATE_FORMATS, FieldKind, FieldSpec, default_date_formats};
pub use normalized::{NormalizedRecord, NormalizedValue};
pub use record::{RawRecord, RecordId, Value};
pub use rejection::{Rejection, RejectionReason, RejectionReport};
pub use schema::{
    DEFAULT_NULL_SENTINELS, FieldConfig, NullSentinels, Schema, SchemaConfig, UnitTableConfig,
    caers,
};
pub use units::{UnitTable, YEARS};
