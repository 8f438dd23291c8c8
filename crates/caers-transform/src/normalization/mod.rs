//! Pure per-field normalization functions.

pub mod binning;
pub mod datetime;
pub mod numeric;
pub mod split;
pub mod units;

pub use binning::classify;
pub use datetime::parse_date;
pub use numeric::{parse_numeric, to_number};
pub use split::{explode, split, split_value};
pub use units::{convert, convert_tagged, convert_value};
