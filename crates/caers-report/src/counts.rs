//! Frequency tables over single fields, field combinations and tokens.

use std::collections::BTreeMap;

use serde::Serialize;

use caers_model::{NormalizedRecord, NormalizedValue};
use caers_transform::explode;

/// Occurrences of one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Occurrences of one combination of values, in the order the fields were given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
    pub values: Vec<String>,
    pub count: usize,
}

/// Counts of each value of `field`, most frequent first.
///
/// Ties are broken by value, ascending. Missing values and token lists are
/// skipped; use [`token_counts`] for multi-valued fields.
pub fn value_counts(records: &[NormalizedRecord], field: &str) -> Vec<ValueCount> {
    let mut tally: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        if let Some(key) = record.get(field).and_then(NormalizedValue::key) {
            *tally.entry(key).or_default() += 1;
        }
    }
    let mut counts: Vec<ValueCount> = tally
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    // Stable sort keeps the BTreeMap's ascending value order within a count.
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Counts of each combination of `fields`, most frequent first.
///
/// A record missing any of the fields is skipped.
pub fn group_counts(records: &[NormalizedRecord], fields: &[&str]) -> Vec<GroupCount> {
    let mut tally: BTreeMap<Vec<String>, usize> = BTreeMap::new();
    for record in records {
        let key: Option<Vec<String>> = fields
            .iter()
            .map(|field| record.get(field).and_then(NormalizedValue::key))
            .collect();
        if let Some(key) = key {
            *tally.entry(key).or_default() += 1;
        }
    }
    let mut counts: Vec<GroupCount> = tally
        .into_iter()
        .map(|(values, count)| GroupCount { values, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Counts of each token of a multi-valued field, most frequent first.
pub fn token_counts(records: &[NormalizedRecord], field: &str) -> Vec<ValueCount> {
    value_counts(&explode(records, field), field)
}

/// The first `n` rows of an already ranked table.
pub fn top_n<T>(mut rows: Vec<T>, n: usize) -> Vec<T> {
    rows.truncate(n);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use caers_model::RecordId;

    fn record(id: usize, gender: &str, role: &str, symptoms: &[&str]) -> NormalizedRecord {
        NormalizedRecord::new(RecordId(id))
            .with("gender", NormalizedValue::Text(gender.to_string()))
            .with("role", NormalizedValue::Text(role.to_string()))
            .with(
                "symptoms",
                NormalizedValue::Tokens(symptoms.iter().map(ToString::to_string).collect()),
            )
    }

    fn records() -> Vec<NormalizedRecord> {
        vec![
            record(1, "Female", "SUSPECT", &["NAUSEA", "VOMITING"]),
            record(2, "Male", "SUSPECT", &["NAUSEA"]),
            record(3, "Female", "CONCOMITANT", &["DIARRHOEA", "NAUSEA"]),
            record(4, "Unknown", "SUSPECT", &["VOMITING"]),
            NormalizedRecord::new(RecordId(5)).with("gender", NormalizedValue::Missing),
        ]
    }

    fn pairs(counts: &[ValueCount]) -> Vec<(&str, usize)> {
        counts
            .iter()
            .map(|count| (count.value.as_str(), count.count))
            .collect()
    }

    #[test]
    fn value_counts_rank_by_count_then_value() {
        let counts = value_counts(&records(), "gender");
        assert_eq!(
            pairs(&counts),
            vec![("Female", 2), ("Male", 1), ("Unknown", 1)]
        );
    }

    #[test]
    fn token_counts_explode_lists() {
        let counts = token_counts(&records(), "symptoms");
        assert_eq!(
            pairs(&counts),
            vec![("NAUSEA", 3), ("VOMITING", 2), ("DIARRHOEA", 1)]
        );
    }

    #[test]
    fn group_counts_skip_incomplete_records() {
        let counts = group_counts(&records(), &["role", "gender"]);
        assert_eq!(counts[0].values, vec!["CONCOMITANT", "Female"]);
        assert_eq!(counts.iter().map(|count| count.count).sum::<usize>(), 4);
        assert_eq!(top_n(counts, 2).len(), 2);
    }
}
