//! Validated bin boundaries and bin labels.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ConfigError;

/// Reasons a bin definition is rejected at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BinsError {
    #[error("{0}")]
    InvalidBoundaries(String),
    #[error("{labels} labels for {intervals} intervals")]
    LabelCount { labels: usize, intervals: usize },
}

impl BinsError {
    /// Attaches the owning field name.
    pub fn for_field(self, field: &str) -> ConfigError {
        match self {
            Self::InvalidBoundaries(reason) => ConfigError::InvalidBoundaries {
                field: field.to_string(),
                reason,
            },
            Self::LabelCount { labels, intervals } => ConfigError::BinLabelCount {
                field: field.to_string(),
                labels,
                intervals,
            },
        }
    }
}

/// Ordered, strictly increasing boundaries defining half-open intervals
/// `[b[i], b[i+1])`, with one label per interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bins {
    boundaries: Vec<f64>,
    labels: Vec<String>,
}

impl Bins {
    /// Validates boundaries and derives `"[lo, hi)"` labels.
    pub fn new(boundaries: Vec<f64>) -> Result<Self, BinsError> {
        validate_boundaries(&boundaries)?;
        let labels = boundaries
            .windows(2)
            .map(|pair| format!("[{}, {})", pair[0], pair[1]))
            .collect();
        Ok(Self { boundaries, labels })
    }

    /// Validates boundaries with caller-supplied interval names.
    pub fn with_labels(boundaries: Vec<f64>, labels: Vec<String>) -> Result<Self, BinsError> {
        validate_boundaries(&boundaries)?;
        let intervals = boundaries.len() - 1;
        if labels.len() != intervals {
            return Err(BinsError::LabelCount {
                labels: labels.len(),
                intervals,
            });
        }
        Ok(Self { boundaries, labels })
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Label for the interval at `index`.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }
}

fn validate_boundaries(boundaries: &[f64]) -> Result<(), BinsError> {
    if boundaries.len() < 2 {
        return Err(BinsError::InvalidBoundaries(format!(
            "need at least 2 boundaries, got {}",
            boundaries.len()
        )));
    }
    if let Some(bad) = boundaries.iter().find(|value| !value.is_finite()) {
        return Err(BinsError::InvalidBoundaries(format!(
            "boundary {bad} is not finite"
        )));
    }
    for pair in boundaries.windows(2) {
        if pair[0] >= pair[1] {
            return Err(BinsError::InvalidBoundaries(format!(
                "{} is not below {}",
                pair[0], pair[1]
            )));
        }
    }
    Ok(())
}

/// Bin assignment for one value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinLabel {
    Bin { index: usize, label: String },
    Unbinned,
}

impl BinLabel {
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Bin { index, .. } => Some(*index),
            Self::Unbinned => None,
        }
    }

    pub fn is_unbinned(&self) -> bool {
        matches!(self, Self::Unbinned)
    }
}

impl fmt::Display for BinLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bin { label, .. } => f.write_str(label),
            Self::Unbinned => f.write_str("unbinned"),
        }
    }
}
