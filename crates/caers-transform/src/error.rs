//! Error types for the normalization pipeline.

use caers_model::ConfigError;
use thiserror::Error;

/// Batch-level failures. Per-record problems never surface here; they land
/// in the rejection report instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// The schema itself is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A declared field is absent from every record of a non-empty batch.
    #[error("declared field '{field}' does not appear in any record")]
    FieldNeverSeen { field: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
