//! Field declarations: semantic type, requiredness and optional binning.

use serde::{Deserialize, Serialize};

use crate::bins::Bins;

/// Date formats accepted when a date field declares none explicitly.
pub const DEFAULT_DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// Semantic type of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// A single number.
    Numeric,
    /// A single categorical value, kept as trimmed text.
    Categorical,
    /// Several categorical tokens joined by a delimiter.
    MultiValued { delimiter: String },
    /// A calendar date in one of the listed `chrono` formats; the first
    /// format is also used when rendering the date back to text.
    Date {
        #[serde(default = "default_date_formats")]
        formats: Vec<String>,
    },
    /// A magnitude whose unit label lives in `unit_field`.
    UnitTagged { unit_field: String },
}

pub fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(ToString::to_string).collect()
}

impl FieldKind {
    /// True for kinds that normalize to a number and can therefore be binned.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric | Self::UnitTagged { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::MultiValued { .. } => "multi_valued",
            Self::Date { .. } => "date",
            Self::UnitTagged { .. } => "unit_tagged",
        }
    }
}

/// Declaration of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub bins: Option<Bins>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            bins: None,
        }
    }

    pub fn categorical(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Categorical)
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Numeric)
    }

    pub fn multi_valued(name: impl Into<String>, delimiter: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::MultiValued {
                delimiter: delimiter.into(),
            },
        )
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::Date {
                formats: default_date_formats(),
            },
        )
    }

    pub fn unit_tagged(name: impl Into<String>, unit_field: impl Into<String>) -> Self {
        Self::new(
            name,
            FieldKind::UnitTagged {
                unit_field: unit_field.into(),
            },
        )
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_bins(mut self, bins: Bins) -> Self {
        self.bins = Some(bins);
        self
    }
}
