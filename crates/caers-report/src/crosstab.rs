//! Two-way counts of a categorical field against a multi-valued field.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use caers_model::{NormalizedRecord, NormalizedValue};
use caers_transform::explode;

/// Counts of every (row value, column token) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrossTab {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    counts: BTreeMap<String, BTreeMap<String, usize>>,
}

impl CrossTab {
    /// Count for one cell; zero when the pair never occurs.
    pub fn get(&self, row: &str, column: &str) -> usize {
        self.counts
            .get(row)
            .and_then(|columns| columns.get(column))
            .copied()
            .unwrap_or(0)
    }

    pub fn row_total(&self, row: &str) -> usize {
        self.counts
            .get(row)
            .map_or(0, |columns| columns.values().sum())
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Cross-tabulate `row_field` against the tokens of `column_field`.
///
/// Each record contributes one count per token, paired with its own row
/// value. Records missing either side are skipped. Rows and columns are
/// sorted ascending.
pub fn crosstab(records: &[NormalizedRecord], row_field: &str, column_field: &str) -> CrossTab {
    let mut counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    let mut columns = BTreeSet::new();
    for row in explode(records, column_field) {
        let Some(row_value) = row.get(row_field).and_then(NormalizedValue::key) else {
            continue;
        };
        let Some(token) = row.text(column_field) else {
            continue;
        };
        columns.insert(token.to_string());
        *counts
            .entry(row_value)
            .or_default()
            .entry(token.to_string())
            .or_default() += 1;
    }
    CrossTab {
        rows: counts.keys().cloned().collect(),
        columns: columns.into_iter().collect(),
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caers_model::RecordId;

    fn record(id: usize, role: &str, outcomes: &[&str]) -> NormalizedRecord {
        NormalizedRecord::new(RecordId(id))
            .with("role", NormalizedValue::Text(role.to_string()))
            .with(
                "outcomes",
                NormalizedValue::Tokens(outcomes.iter().map(ToString::to_string).collect()),
            )
    }

    #[test]
    fn tokens_stay_with_their_own_record() {
        let records = vec![
            record(1, "SUSPECT", &["DEATH", "HOSPITALIZATION"]),
            record(2, "CONCOMITANT", &["OTHER"]),
            record(3, "SUSPECT", &["OTHER"]),
            record(4, "CONCOMITANT", &[]),
        ];
        let table = crosstab(&records, "role", "outcomes");
        assert_eq!(table.rows, vec!["CONCOMITANT", "SUSPECT"]);
        assert_eq!(table.columns, vec!["DEATH", "HOSPITALIZATION", "OTHER"]);
        assert_eq!(table.get("SUSPECT", "DEATH"), 1);
        assert_eq!(table.get("SUSPECT", "OTHER"), 1);
        assert_eq!(table.get("CONCOMITANT", "OTHER"), 1);
        assert_eq!(table.get("CONCOMITANT", "DEATH"), 0);
        assert_eq!(table.row_total("SUSPECT"), 3);
        assert_eq!(table.row_total("CONCOMITANT"), 1);
    }
}
