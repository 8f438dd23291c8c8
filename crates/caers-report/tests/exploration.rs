//! Integration tests for the CAERS exploration views.

use caers_model::{RawRecord, RecordId, Schema, caers};
use caers_report::{Exploration, ExploreOptions, month_name, token_counts, value_counts};
use caers_transform::normalize;
use proptest::prelude::*;

fn row(
    id: usize,
    brand: &str,
    role: &str,
    age: &str,
    unit: &str,
    gender: &str,
    outcomes: &str,
) -> RawRecord {
    RawRecord::new(RecordId(id))
        .with(caers::REPORT_ID, format!("R{id}"))
        .with(caers::CREATED_DATE, "05/02/2014")
        .with(caers::EVENT_START_DATE, "04/30/2014")
        .with(caers::PRODUCT_ROLE, role)
        .with(caers::BRAND_NAME, brand)
        .with(caers::INDUSTRY_CODE, "54")
        .with(caers::INDUSTRY_NAME, "Vit/Min/Prot/Unconv Diet(Human/Animal)")
        .with(caers::AGE, age)
        .with(caers::AGE_UNIT, unit)
        .with(caers::GENDER, gender)
        .with(caers::OUTCOMES, outcomes)
        .with(caers::SYMPTOMS, "DIARRHOEA, NAUSEA")
}

fn exploration(options: &ExploreOptions) -> Exploration {
    let records = vec![
        row(1, "REDACTED", "SUSPECT", "50", "Year(s)", "Female", "DEATH, HOSPITALIZATION"),
        row(2, "VITAMIN D", "CONCOMITANT", "18", "Month(s)", "Male", "OTHER SERIOUS"),
        row(3, "REDACTED", "SUSPECT", "62", "Year(s)", "Female", "HOSPITALIZATION"),
        row(4, "MULTIVITAMIN", "SUSPECT", "130", "Year(s)", "Female", "DISABILITY"),
        row(5, "REDACTED", "SUSPECT", "47", "Fortnight(s)", "Male", "DEATH"),
    ];
    let normalized = normalize(&records, &Schema::caers()).unwrap();
    assert_eq!(normalized.kept(), 4);
    Exploration::build(&normalized.records, options)
}

#[test]
fn ranked_tables() {
    let view = exploration(&ExploreOptions::default());
    assert_eq!(view.records, 4);
    insta::assert_json_snapshot!(view.genders, @r#"
    [
      {
        "value": "Female",
        "count": 3
      },
      {
        "value": "Male",
        "count": 1
      }
    ]
    "#);
    assert_eq!(view.brand_roles[0].values, vec!["REDACTED", "SUSPECT"]);
    assert_eq!(view.brand_roles[0].count, 2);
    assert_eq!(view.top_outcomes[0].value, "HOSPITALIZATION");
    assert_eq!(view.top_outcomes[0].count, 2);
    assert_eq!(view.industries.len(), 1);
}

#[test]
fn top_limits_ranked_tables_only() {
    let view = exploration(&ExploreOptions::default().with_top(1));
    assert_eq!(view.brand_roles.len(), 1);
    assert_eq!(view.top_symptoms.len(), 1);
    assert_eq!(view.top_outcomes.len(), 1);
    assert_eq!(view.genders.len(), 2);
}

#[test]
fn ages_are_binned_in_years() {
    let view = exploration(&ExploreOptions::default());
    let bins: Vec<(&str, usize)> = view
        .age_bins
        .iter()
        .map(|bin| (bin.label.as_str(), bin.count))
        .collect();
    // 130 years is past the last boundary and stays out.
    assert_eq!(bins, vec![("[0, 5)", 1), ("[45, 60)", 1), ("[60, 75)", 1)]);
}

#[test]
fn outcomes_by_role_and_dates() {
    let view = exploration(&ExploreOptions::default());
    let table = &view.outcomes_by_role;
    assert_eq!(table.rows, vec!["CONCOMITANT", "SUSPECT"]);
    assert_eq!(table.get("SUSPECT", "HOSPITALIZATION"), 2);
    assert_eq!(table.get("SUSPECT", "DEATH"), 1);
    assert_eq!(table.get("CONCOMITANT", "OTHER SERIOUS"), 1);
    assert_eq!(table.row_total("SUSPECT"), 4);

    assert_eq!(view.created_by_year.len(), 1);
    assert_eq!(view.created_by_year[0].period, 2014);
    assert_eq!(
        view.event_months
            .iter()
            .map(|month| month_name(month.period))
            .collect::<Vec<_>>(),
        vec![Some("Apr")]
    );
    let summary = view.report_lag_summary.unwrap();
    assert_eq!((summary.count, summary.min, summary.max), (4, 2, 2));
    let histogram: Vec<(&str, usize)> = view
        .lag_histogram
        .iter()
        .map(|bin| (bin.label.as_str(), bin.count))
        .collect();
    assert_eq!(histogram, vec![("[2, 3)", 4)]);
}

proptest! {
    #[test]
    fn counts_cover_every_token(lists in prop::collection::vec("[A-D](, [A-D]){0,3}", 1..10)) {
        let schema = Schema::caers();
        let records: Vec<RawRecord> = lists
            .iter()
            .enumerate()
            .map(|(index, outcomes)| {
                row(index + 1, "B", "SUSPECT", "30", "Year(s)", "Female", outcomes)
            })
            .collect();
        let normalized = normalize(&records, &schema).unwrap();
        let tokens: usize = normalized
            .records
            .iter()
            .map(|record| record.tokens(caers::OUTCOMES).len())
            .sum();

        let counts = token_counts(&normalized.records, caers::OUTCOMES);
        prop_assert_eq!(counts.iter().map(|count| count.count).sum::<usize>(), tokens);
        for pair in counts.windows(2) {
            prop_assert!(pair[0].count >= pair[1].count);
            if pair[0].count == pair[1].count {
                prop_assert!(pair[0].value < pair[1].value);
            }
        }
        let genders = value_counts(&normalized.records, caers::GENDER);
        prop_assert_eq!(genders[0].count, normalized.kept());
    }
}
