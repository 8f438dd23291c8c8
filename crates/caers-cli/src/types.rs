use std::path::PathBuf;

use caers_report::Exploration;
use caers_transform::Normalized;

#[derive(Debug)]
pub struct NormalizeResult {
    pub input: PathBuf,
    pub columns: usize,
    pub normalized: Normalized,
    pub output: Option<PathBuf>,
}

#[derive(Debug)]
pub struct ExploreResult {
    pub input: PathBuf,
    pub input_count: usize,
    pub rejected: usize,
    pub exploration: Exploration,
}
