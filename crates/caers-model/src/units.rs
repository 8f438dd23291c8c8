//! Closed unit tables mapping unit labels to a canonical unit.

use std::collections::BTreeMap;

use crate::error::ConfigError;

/// Canonical label of the default age table.
pub const YEARS: &str = "Year(s)";

/// A closed set of unit labels with linear divisors into one canonical unit.
///
/// `canonical = value / divisor`. Labels are matched after trimming and are
/// case-sensitive. A label outside the table is an error, never a guess.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitTable {
    canonical: String,
    divisors: BTreeMap<String, f64>,
}

impl UnitTable {
    /// Builds a table; the canonical label must be present with divisor 1.
    pub fn new(
        canonical: impl Into<String>,
        divisors: BTreeMap<String, f64>,
    ) -> Result<Self, ConfigError> {
        let canonical = canonical.into().trim().to_string();
        let mut trimmed = BTreeMap::new();
        for (unit, divisor) in divisors {
            if !divisor.is_finite() || divisor <= 0.0 {
                return Err(ConfigError::InvalidUnitDivisor { unit, divisor });
            }
            trimmed.insert(unit.trim().to_string(), divisor);
        }
        if trimmed.get(&canonical).copied() != Some(1.0) {
            return Err(ConfigError::InvalidCanonicalUnit { unit: canonical });
        }
        Ok(Self {
            canonical,
            divisors: trimmed,
        })
    }

    /// Age units observed in CAERS, canonicalized to years.
    pub fn ages() -> Self {
        Self {
            canonical: YEARS.to_string(),
            divisors: BTreeMap::from([
                (YEARS.to_string(), 1.0),
                ("Month(s)".to_string(), 12.0),
                ("Week(s)".to_string(), 52.0),
                ("Day(s)".to_string(), 365.0),
            ]),
        }
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Divisor for a unit label, `None` when the label is not recognized.
    pub fn divisor(&self, unit: &str) -> Option<f64> {
        self.divisors.get(unit.trim()).copied()
    }

    pub fn contains(&self, unit: &str) -> bool {
        self.divisor(unit).is_some()
    }

    pub fn units(&self) -> impl Iterator<Item = (&str, f64)> {
        self.divisors
            .iter()
            .map(|(unit, divisor)| (unit.as_str(), *divisor))
    }

    /// Inverse conversion from the canonical unit back into `unit`.
    pub fn from_canonical(&self, canonical: f64, unit: &str) -> Option<f64> {
        self.divisor(unit).map(|divisor| canonical * divisor)
    }
}

impl Default for UnitTable {
    fn default() -> Self {
        Self::ages()
    }
}
