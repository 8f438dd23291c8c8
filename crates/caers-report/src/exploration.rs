//! The full set of CAERS views, computed in one pass over a normalized batch.

use serde::Serialize;
use tracing::{debug, info_span};

use caers_model::{NormalizedRecord, caers};

use crate::counts::{GroupCount, ValueCount, group_counts, token_counts, top_n, value_counts};
use crate::crosstab::{CrossTab, crosstab};
use crate::lag::{LAG_HISTOGRAM_BINS, LagSummary, TimeLag, lag_histogram, time_lags};
use crate::periods::{BinCount, PeriodCount, bin_counts, month_counts, year_counts};

/// Row limit for ranked tables when none is given.
pub const DEFAULT_TOP: usize = 10;

/// Options for [`Exploration::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExploreOptions {
    /// Row limit for the ranked brand, symptom and outcome tables.
    pub top: usize,
}

impl Default for ExploreOptions {
    fn default() -> Self {
        Self { top: DEFAULT_TOP }
    }
}

impl ExploreOptions {
    #[must_use]
    pub fn with_top(mut self, top: usize) -> Self {
        self.top = top;
        self
    }
}

/// Aggregated views over the CAERS columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exploration {
    pub records: usize,
    /// Reports per year the report was created.
    pub created_by_year: Vec<PeriodCount>,
    /// Reports per year the event started.
    pub started_by_year: Vec<PeriodCount>,
    /// Most reported brand and product role pairs.
    pub brand_roles: Vec<GroupCount>,
    pub top_symptoms: Vec<ValueCount>,
    pub top_outcomes: Vec<ValueCount>,
    /// Age distribution in canonical years.
    pub age_bins: Vec<BinCount>,
    pub genders: Vec<ValueCount>,
    pub industries: Vec<GroupCount>,
    pub outcomes_by_role: CrossTab,
    /// Days from event start to report creation.
    pub report_lags: Vec<TimeLag>,
    pub report_lag_summary: Option<LagSummary>,
    /// Report lags in fixed-width day bins.
    pub lag_histogram: Vec<BinCount>,
    /// Events per calendar month of the event start date.
    pub event_months: Vec<PeriodCount>,
}

impl Exploration {
    pub fn build(records: &[NormalizedRecord], options: &ExploreOptions) -> Self {
        let span = info_span!("explore", records = records.len());
        let _guard = span.enter();

        let report_lags = time_lags(records, caers::EVENT_START_DATE, caers::CREATED_DATE);
        let exploration = Self {
            records: records.len(),
            created_by_year: year_counts(records, caers::CREATED_DATE),
            started_by_year: year_counts(records, caers::EVENT_START_DATE),
            brand_roles: top_n(
                group_counts(records, &[caers::BRAND_NAME, caers::PRODUCT_ROLE]),
                options.top,
            ),
            top_symptoms: top_n(token_counts(records, caers::SYMPTOMS), options.top),
            top_outcomes: top_n(token_counts(records, caers::OUTCOMES), options.top),
            age_bins: bin_counts(records, caers::AGE),
            genders: value_counts(records, caers::GENDER),
            industries: group_counts(records, &[caers::INDUSTRY_CODE, caers::INDUSTRY_NAME]),
            outcomes_by_role: crosstab(records, caers::PRODUCT_ROLE, caers::OUTCOMES),
            report_lag_summary: LagSummary::from_lags(&report_lags),
            lag_histogram: lag_histogram(&report_lags, LAG_HISTOGRAM_BINS),
            report_lags,
            event_months: month_counts(records, caers::EVENT_START_DATE),
        };
        debug!(
            symptoms = exploration.top_symptoms.len(),
            outcomes = exploration.top_outcomes.len(),
            lags = exploration.report_lags.len(),
            "exploration built"
        );
        exploration
    }
}
