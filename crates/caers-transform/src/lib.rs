//! Record filtering and normalization for CAERS batches.
//!
//! # Overview
//!
//! - **Per-field functions**: unit conversion, delimited-list splitting,
//!   numeric and date parsing, half-open binning
//! - **Filter**: drops incomplete records and exact duplicates
//! - **Pipeline**: runs the filter and every per-field stage over a batch,
//!   returning clean records plus a rejection report
//!
//! # Example
//!
//! ```ignore
//! use caers_model::Schema;
//! use caers_transform::Normalizer;
//!
//! let normalizer = Normalizer::new(Schema::caers());
//! let output = normalizer.normalize(&records)?;
//! for rejection in &output.rejections {
//!     println!("{}: {}", rejection.record, rejection.reason);
//! }
//! ```

mod error;
mod pipeline;

pub mod filter;
pub mod normalization;

pub use error::{PipelineError, Result};
pub use filter::{FilterOutcome, filter_records, missing_required_field};
pub use normalization::{
    classify, convert, convert_tagged, convert_value, explode, parse_date, parse_numeric, split,
    split_value, to_number,
};
pub use pipeline::{Normalized, Normalizer, normalize};
