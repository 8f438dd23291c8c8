//! Delay between two dates of the same record.

use serde::Serialize;

use caers_model::{BinLabel, Bins, NormalizedRecord, RecordId};
use caers_transform::classify;

use crate::periods::BinCount;

/// Bins used for the report-lag histogram.
pub const LAG_HISTOGRAM_BINS: usize = 50;

/// Days from `from` to `to` for one record; negative when `to` is earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeLag {
    pub record: RecordId,
    pub days: i64,
}

/// Distribution summary of a set of lags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LagSummary {
    pub count: usize,
    pub min: i64,
    pub median: f64,
    pub max: i64,
}

impl LagSummary {
    /// `None` for an empty set.
    pub fn from_lags(lags: &[TimeLag]) -> Option<Self> {
        let mut days: Vec<i64> = lags.iter().map(|lag| lag.days).collect();
        days.sort_unstable();
        let (&min, &max) = (days.first()?, days.last()?);
        let mid = days.len() / 2;
        let median = if days.len() % 2 == 0 {
            (days[mid - 1] as f64 + days[mid] as f64) / 2.0
        } else {
            days[mid] as f64
        };
        Some(Self {
            count: days.len(),
            min,
            median,
            max,
        })
    }
}

/// Lags for every record holding both dates, in record order.
pub fn time_lags(records: &[NormalizedRecord], from: &str, to: &str) -> Vec<TimeLag> {
    records
        .iter()
        .filter_map(|record| {
            let start = record.date(from)?;
            let end = record.date(to)?;
            Some(TimeLag {
                record: record.id,
                days: (end - start).num_days(),
            })
        })
        .collect()
}

/// Fixed-width histogram of lag days over `[min, max]`.
///
/// Bins are whole days wide, at most `max_bins` of them, and every bin is
/// listed including empty ones. An empty input yields no bins.
pub fn lag_histogram(lags: &[TimeLag], max_bins: usize) -> Vec<BinCount> {
    let (Some(min), Some(max)) = (
        lags.iter().map(|lag| lag.days).min(),
        lags.iter().map(|lag| lag.days).max(),
    ) else {
        return Vec::new();
    };
    let span = (max - min).unsigned_abs() + 1;
    let width = span.div_ceil(max_bins.max(1) as u64);
    let bins = span.div_ceil(width);
    let boundaries = (0..=bins)
        .map(|index| (min as f64) + (index * width) as f64)
        .collect();
    // Integer boundaries from a non-empty span are strictly increasing.
    let Ok(bins) = Bins::new(boundaries) else {
        return Vec::new();
    };
    let mut counts: Vec<BinCount> = bins
        .labels()
        .iter()
        .enumerate()
        .map(|(index, label)| BinCount {
            index,
            label: label.clone(),
            count: 0,
        })
        .collect();
    for lag in lags {
        if let BinLabel::Bin { index, .. } = classify(Some(lag.days as f64), &bins) {
            counts[index].count += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use caers_model::NormalizedValue;
    use chrono::NaiveDate;

    type Ymd = (i32, u32, u32);

    fn record(id: usize, start: Ymd, created: Option<Ymd>) -> NormalizedRecord {
        let date = |(y, m, d): Ymd| {
            NormalizedValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
        };
        NormalizedRecord::new(RecordId(id))
            .with("start", date(start))
            .with("created", created.map_or(NormalizedValue::Missing, date))
    }

    #[test]
    fn lags_in_days() {
        let records = vec![
            record(1, (2014, 4, 20), Some((2014, 4, 24))),
            record(2, (2014, 4, 20), None),
            record(3, (2013, 12, 31), Some((2014, 1, 1))),
            record(4, (2015, 1, 10), Some((2015, 1, 1))),
        ];
        let lags = time_lags(&records, "start", "created");
        assert_eq!(
            lags,
            vec![
                TimeLag { record: RecordId(1), days: 4 },
                TimeLag { record: RecordId(3), days: 1 },
                TimeLag { record: RecordId(4), days: -9 },
            ]
        );
        let summary = LagSummary::from_lags(&lags).unwrap();
        assert_eq!(summary.count, 3);
        assert_eq!(summary.min, -9);
        assert_eq!(summary.max, 4);
        assert!((summary.median - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn even_median_and_empty_set() {
        let lags: Vec<TimeLag> = [1, 2, 3, 10]
            .into_iter()
            .map(|days| TimeLag { record: RecordId(1), days })
            .collect();
        let summary = LagSummary::from_lags(&lags).unwrap();
        assert!((summary.median - 2.5).abs() < f64::EPSILON);
        assert_eq!(LagSummary::from_lags(&[]), None);
    }

    fn lags(days: &[i64]) -> Vec<TimeLag> {
        days.iter()
            .map(|&days| TimeLag { record: RecordId(1), days })
            .collect()
    }

    #[test]
    fn histogram_covers_min_to_max() {
        let histogram = lag_histogram(&lags(&[-9, 0, 1, 4, 4, 40]), 5);
        let rows: Vec<(&str, usize)> = histogram
            .iter()
            .map(|bin| (bin.label.as_str(), bin.count))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("[-9, 1)", 2),
                ("[1, 11)", 3),
                ("[11, 21)", 0),
                ("[21, 31)", 0),
                ("[31, 41)", 1),
            ]
        );
    }

    #[test]
    fn narrow_spans_use_one_day_bins() {
        let histogram = lag_histogram(&lags(&[3, 3, 5]), LAG_HISTOGRAM_BINS);
        let counts: Vec<usize> = histogram.iter().map(|bin| bin.count).collect();
        assert_eq!(counts, vec![2, 0, 1]);
        assert_eq!(histogram[0].label, "[3, 4)");
        assert!(lag_histogram(&[], LAG_HISTOGRAM_BINS).is_empty());
    }

    #[test]
    fn histogram_respects_bin_limit() {
        let histogram = lag_histogram(&lags(&[0, 999]), LAG_HISTOGRAM_BINS);
        assert_eq!(histogram.len(), LAG_HISTOGRAM_BINS);
        assert_eq!(histogram.iter().map(|bin| bin.count).sum::<usize>(), 2);
        assert_eq!(histogram[LAG_HISTOGRAM_BINS - 1].count, 1);
    }
}
