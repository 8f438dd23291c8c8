//! Bin distributions and calendar period counts.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use caers_model::{BinLabel, NormalizedRecord};

/// Short month names, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Records falling into one bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinCount {
    pub index: usize,
    pub label: String,
    pub count: usize,
}

/// Records in one calendar year or month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodCount {
    pub period: i32,
    pub count: usize,
}

/// Counts per observed bin of `field`, in bin order. Unbinned records are
/// left out.
pub fn bin_counts(records: &[NormalizedRecord], field: &str) -> Vec<BinCount> {
    let mut tally: BTreeMap<usize, (String, usize)> = BTreeMap::new();
    for record in records {
        if let Some(BinLabel::Bin { index, label }) = record.bin(field) {
            tally.entry(*index).or_insert_with(|| (label.clone(), 0)).1 += 1;
        }
    }
    tally
        .into_iter()
        .map(|(index, (label, count))| BinCount {
            index,
            label,
            count,
        })
        .collect()
}

/// Counts per calendar year of a date field, oldest first.
pub fn year_counts(records: &[NormalizedRecord], date_field: &str) -> Vec<PeriodCount> {
    period_counts(records, date_field, NaiveDate::year)
}

/// Counts per month (1-12) of a date field regardless of year.
pub fn month_counts(records: &[NormalizedRecord], date_field: &str) -> Vec<PeriodCount> {
    period_counts(records, date_field, |date| date.month() as i32)
}

fn period_counts<F>(records: &[NormalizedRecord], date_field: &str, period: F) -> Vec<PeriodCount>
where
    F: Fn(&NaiveDate) -> i32,
{
    let mut tally: BTreeMap<i32, usize> = BTreeMap::new();
    for date in records.iter().filter_map(|record| record.date(date_field)) {
        *tally.entry(period(&date)).or_default() += 1;
    }
    tally
        .into_iter()
        .map(|(period, count)| PeriodCount { period, count })
        .collect()
}

/// Short name for a month number, `None` outside 1-12.
pub fn month_name(month: i32) -> Option<&'static str> {
    usize::try_from(month)
        .ok()
        .and_then(|month| month.checked_sub(1))
        .and_then(|index| MONTH_NAMES.get(index).copied())
}
