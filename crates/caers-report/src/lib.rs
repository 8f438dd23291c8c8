//! Aggregation views over normalized CAERS records.
//!
//! Every function here is pure and works on `&[NormalizedRecord]`:
//!
//! - **Counts**: value, group and token frequencies ranked by count
//! - **Periods**: bin distributions and year/month counts
//! - **Cross tabulation**: a categorical field against the tokens of a
//!   multi-valued field, paired per record
//! - **Lags**: day differences between two date fields and their histogram
//!
//! [`Exploration`] bundles all of them for the CAERS columns.

mod counts;
mod crosstab;
mod exploration;
mod lag;
mod periods;

pub use counts::{GroupCount, ValueCount, group_counts, token_counts, top_n, value_counts};
pub use crosstab::{CrossTab, crosstab};
pub use exploration::{DEFAULT_TOP, Exploration, ExploreOptions};
pub use lag::{LAG_HISTOGRAM_BINS, LagSummary, TimeLag, lag_histogram, time_lags};
pub use periods::{
    BinCount, MONTH_NAMES, PeriodCount, bin_counts, month_counts, month_name, year_counts,
};
