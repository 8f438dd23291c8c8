//! Validated schema: field declarations, unit table and null sentinels.
//!
//! A [`Schema`] is built either in code or from a [`SchemaConfig`] (the
//! serde form read from JSON). All configuration errors surface here, once,
//! before any record is processed.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::bins::Bins;
use crate::error::{ConfigError, Result};
use crate::field::{FieldKind, FieldSpec};
use crate::record::Value;
use crate::units::UnitTable;

/// Column names of the CAERS 2004-2017Q2 export.
pub mod caers {
    pub const REPORT_ID: &str = "RA_Report #";
    pub const CREATED_DATE: &str = "RA_CAERS Created Date";
    pub const EVENT_START_DATE: &str = "AEC_Event Start Date";
    pub const PRODUCT_ROLE: &str = "PRI_Product Role";
    pub const BRAND_NAME: &str = "PRI_Reported Brand/Product Name";
    pub const INDUSTRY_CODE: &str = "PRI_FDA Industry Code";
    pub const INDUSTRY_NAME: &str = "PRI_FDA Industry Name";
    pub const AGE: &str = "CI_Age at Adverse Event";
    pub const AGE_UNIT: &str = "CI_Age Unit";
    pub const GENDER: &str = "CI_Gender";
    pub const OUTCOMES: &str = "AEC_One Row Outcomes";
    pub const SYMPTOMS: &str = "SYM_One Row Coded Symptoms";

    /// Delimiter of the "One Row" multi-valued columns.
    pub const LIST_DELIMITER: &str = ", ";

    /// Age bin boundaries, in years.
    pub const AGE_BINS: &[f64] = &[0.0, 5.0, 12.0, 18.0, 30.0, 45.0, 60.0, 75.0, 90.0, 100.0];
}

/// Missing-value markers recognized by common CSV readers (pandas defaults).
pub const DEFAULT_NULL_SENTINELS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Set of strings treated as missing after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullSentinels(BTreeSet<String>);

impl NullSentinels {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: BTreeSet<String> = values
            .into_iter()
            .map(|value| value.into().trim().to_string())
            .collect();
        // Blank text is always missing.
        set.insert(String::new());
        Self(set)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.0.contains(text.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for NullSentinels {
    fn default() -> Self {
        Self::new(DEFAULT_NULL_SENTINELS.iter().copied())
    }
}

/// Validated normalization configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
    units: UnitTable,
    null_sentinels: NullSentinels,
    require_declared_fields: bool,
}

impl Schema {
    /// Validates field declarations against each other and the unit table.
    pub fn new(fields: Vec<FieldSpec>, units: UnitTable) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for spec in &fields {
            if !seen.insert(spec.name.as_str()) {
                return Err(ConfigError::DuplicateField {
                    field: spec.name.clone(),
                });
            }
        }
        for spec in &fields {
            match &spec.kind {
                FieldKind::MultiValued { delimiter } if delimiter.is_empty() => {
                    return Err(ConfigError::EmptyDelimiter {
                        field: spec.name.clone(),
                    });
                }
                FieldKind::Date { formats } if formats.is_empty() => {
                    return Err(ConfigError::NoDateFormats {
                        field: spec.name.clone(),
                    });
                }
                FieldKind::UnitTagged { unit_field } if !seen.contains(unit_field.as_str()) => {
                    return Err(ConfigError::UnknownUnitField {
                        field: spec.name.clone(),
                        unit_field: unit_field.clone(),
                    });
                }
                _ => {}
            }
            if spec.bins.is_some() && !spec.kind.is_numeric() {
                return Err(ConfigError::BinsOnNonNumericField {
                    field: spec.name.clone(),
                });
            }
        }
        Ok(Self {
            fields,
            units,
            null_sentinels: NullSentinels::default(),
            require_declared_fields: false,
        })
    }

    /// The CAERS export layout; every column is required.
    ///
    /// # Panics
    ///
    /// Panics if the built-in CAERS declarations fail [`Schema::new`]
    /// validation, which the unit tests rule out.
    pub fn caers() -> Self {
        let age_bins = Bins::new(caers::AGE_BINS.to_vec())
            .expect("built-in age bins are strictly increasing");
        let fields = vec![
            FieldSpec::categorical(caers::REPORT_ID).required(),
            FieldSpec::date(caers::CREATED_DATE).required(),
            FieldSpec::date(caers::EVENT_START_DATE).required(),
            FieldSpec::categorical(caers::PRODUCT_ROLE).required(),
            FieldSpec::categorical(caers::BRAND_NAME).required(),
            FieldSpec::categorical(caers::INDUSTRY_CODE).required(),
            FieldSpec::categorical(caers::INDUSTRY_NAME).required(),
            FieldSpec::unit_tagged(caers::AGE, caers::AGE_UNIT)
                .required()
                .with_bins(age_bins),
            FieldSpec::categorical(caers::AGE_UNIT).required(),
            FieldSpec::categorical(caers::GENDER).required(),
            FieldSpec::multi_valued(caers::OUTCOMES, caers::LIST_DELIMITER).required(),
            FieldSpec::multi_valued(caers::SYMPTOMS, caers::LIST_DELIMITER).required(),
        ];
        Self::new(fields, UnitTable::ages()).expect("built-in CAERS schema is valid")
    }

    #[must_use]
    pub fn with_null_sentinels(mut self, sentinels: NullSentinels) -> Self {
        self.null_sentinels = sentinels;
        self
    }

    /// Fail the whole batch when a declared field appears in no record.
    #[must_use]
    pub fn with_require_declared_fields(mut self, enable: bool) -> Self {
        self.require_declared_fields = enable;
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|spec| spec.required)
    }

    pub fn units(&self) -> &UnitTable {
        &self.units
    }

    pub fn null_sentinels(&self) -> &NullSentinels {
        &self.null_sentinels
    }

    pub fn require_declared_fields(&self) -> bool {
        self.require_declared_fields
    }

    /// True when a value counts as missing: null, NaN, or a null sentinel.
    pub fn is_missing(&self, value: Option<&Value>) -> bool {
        match value {
            None | Some(Value::Null) => true,
            Some(Value::Number(number)) => number.is_nan(),
            Some(Value::Text(text)) => self.null_sentinels.contains(text),
        }
    }

    /// Serde form of this schema.
    pub fn to_config(&self) -> SchemaConfig {
        SchemaConfig {
            fields: self.fields.iter().map(FieldConfig::from).collect(),
            units: Some(UnitTableConfig {
                canonical: self.units.canonical().to_string(),
                divisors: self
                    .units
                    .units()
                    .map(|(unit, divisor)| (unit.to_string(), divisor))
                    .collect(),
            }),
            null_sentinels: Some(self.null_sentinels.iter().map(ToString::to_string).collect()),
            require_declared_fields: self.require_declared_fields,
        }
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::caers()
    }
}

/// JSON form of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub fields: Vec<FieldConfig>,
    /// Defaults to the age table when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<UnitTableConfig>,
    /// Defaults to [`DEFAULT_NULL_SENTINELS`] when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_sentinels: Option<Vec<String>>,
    #[serde(default)]
    pub require_declared_fields: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bins: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin_labels: Option<Vec<String>>,
}

impl From<&FieldSpec> for FieldConfig {
    fn from(spec: &FieldSpec) -> Self {
        Self {
            name: spec.name.clone(),
            kind: spec.kind.clone(),
            required: spec.required,
            bins: spec.bins.as_ref().map(|bins| bins.boundaries().to_vec()),
            bin_labels: spec.bins.as_ref().map(|bins| bins.labels().to_vec()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTableConfig {
    pub canonical: String,
    pub divisors: BTreeMap<String, f64>,
}

impl TryFrom<SchemaConfig> for Schema {
    type Error = ConfigError;

    fn try_from(config: SchemaConfig) -> Result<Self> {
        let mut fields = Vec::with_capacity(config.fields.len());
        for field in config.fields {
            let mut spec = FieldSpec::new(field.name, field.kind);
            spec.required = field.required;
            if let Some(boundaries) = field.bins {
                let bins = match field.bin_labels {
                    Some(labels) => Bins::with_labels(boundaries, labels),
                    None => Bins::new(boundaries),
                }
                .map_err(|err| err.for_field(&spec.name))?;
                spec.bins = Some(bins);
            }
            fields.push(spec);
        }
        let units = match config.units {
            Some(units) => UnitTable::new(units.canonical, units.divisors)?,
            None => UnitTable::ages(),
        };
        let mut schema = Schema::new(fields, units)?
            .with_require_declared_fields(config.require_declared_fields);
        if let Some(sentinels) = config.null_sentinels {
            schema = schema.with_null_sentinels(NullSentinels::new(sentinels));
        }
        Ok(schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caers_schema_is_valid() {
        let schema = Schema::caers();
        let rebuilt = Schema::new(schema.fields().to_vec(), schema.units().clone())
            .expect("caers schema validates");
        assert_eq!(rebuilt.fields().len(), 12);
        assert_eq!(schema.required_fields().count(), 12);
        let age = schema.field(caers::AGE).expect("age field");
        assert_eq!(age.bins.as_ref().map(Bins::len), Some(9));
        assert_eq!(rebuilt, schema);
        assert_eq!(Schema::try_from(schema.to_config()).as_ref(), Ok(&schema));
    }

    #[test]
    fn rejects_duplicate_fields() {
        let err = Schema::new(
            vec![FieldSpec::categorical("a"), FieldSpec::numeric("a")],
            UnitTable::ages(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateField {
                field: "a".to_string()
            }
        );
    }

    #[test]
    fn rejects_bins_on_categorical() {
        let bins = Bins::new(vec![0.0, 1.0]).unwrap();
        let err = Schema::new(
            vec![FieldSpec::categorical("a").with_bins(bins)],
            UnitTable::ages(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::BinsOnNonNumericField { .. }));
    }

    #[test]
    fn rejects_undeclared_unit_field() {
        let err = Schema::new(
            vec![FieldSpec::unit_tagged("age", "unit")],
            UnitTable::ages(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownUnitField { .. }));
    }

    #[test]
    fn rejects_empty_delimiter() {
        let err = Schema::new(
            vec![FieldSpec::multi_valued("tags", "")],
            UnitTable::ages(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyDelimiter { .. }));
    }

    #[test]
    fn missing_values() {
        let schema = Schema::caers();
        assert!(schema.is_missing(None));
        assert!(schema.is_missing(Some(&Value::Null)));
        assert!(schema.is_missing(Some(&Value::text("  "))));
        assert!(schema.is_missing(Some(&Value::text("N/A"))));
        assert!(schema.is_missing(Some(&Value::Number(f64::NAN))));
        assert!(!schema.is_missing(Some(&Value::text("0"))));
        assert!(!schema.is_missing(Some(&Value::Number(0.0))));
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = Schema::caers().to_config();
        let json = serde_json::to_string_pretty(&config).expect("serialize schema");
        let parsed: SchemaConfig = serde_json::from_str(&json).expect("deserialize schema");
        let schema = Schema::try_from(parsed).expect("validate schema");
        assert_eq!(schema, Schema::caers());
    }

    #[test]
    fn config_surfaces_invalid_boundaries() {
        let json = r#"{
            "fields": [
                {"name": "age", "type": "numeric", "bins": [0, 10, 5]}
            ]
        }"#;
        let config: SchemaConfig = serde_json::from_str(json).expect("parse");
        let err = Schema::try_from(config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBoundaries { ref field, .. } if field == "age"));
    }
}
