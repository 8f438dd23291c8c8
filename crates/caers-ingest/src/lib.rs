//! CAERS data ingestion.
//!
//! Reads delimited exports into [`caers_model::RawRecord`]s and loads JSON
//! schema files. All file I/O of the workspace outside the CLI lives here.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use caers_ingest::{load_schema, read_csv_records};
//!
//! let batch = read_csv_records(Path::new("CAERS_ASCII_2004_2017Q2.csv"))?;
//! let schema = load_schema(Path::new("schema.json"))?;
//! ```

mod error;
mod reader;
mod schema;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use reader::{RawBatch, read_csv_records, read_csv_records_from_reader};

// === Schema Files ===
pub use schema::load_schema;
