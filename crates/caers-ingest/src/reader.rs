//! CSV loading into raw records.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use caers_model::{RawRecord, RecordId, Value};

use crate::error::{IngestError, Result};

/// Source name used in errors for reader-based input.
const READER_SOURCE: &str = "<reader>";

/// Header plus every data row of one CSV input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawBatch {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl RawBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

fn is_blank(row: &StringRecord) -> bool {
    row.iter().all(|cell| normalize_cell(cell).is_empty())
}

/// Reads a CSV file; see [`read_csv_records_from_reader`] for the row rules.
pub fn read_csv_records(path: &Path) -> Result<RawBatch> {
    let file = File::open(path).map_err(|err| IngestError::io(path, err))?;
    read_records(file, path)
}

/// Reads CSV text into raw records.
///
/// The first non-blank row is the header. Blank rows are skipped, short rows
/// are padded with nulls and cells past the last header are ignored. Empty
/// cells become [`Value::Null`]; everything else is trimmed text. Record ids
/// count data rows from 1. A repeated header keeps its first column.
pub fn read_csv_records_from_reader<R: Read>(reader: R) -> Result<RawBatch> {
    read_records(reader, Path::new(READER_SOURCE))
}

fn read_records<R: Read>(input: R, source: &Path) -> Result<RawBatch> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut rows = reader.into_records();

    let headers: Vec<String> = loop {
        let Some(row) = rows.next() else {
            return Err(IngestError::EmptyCsv {
                path: source.to_path_buf(),
            });
        };
        let row = row.map_err(|err| parse_error(source, &err))?;
        if !is_blank(&row) {
            break row.iter().map(normalize_header).collect();
        }
    };

    let mut records = Vec::new();
    for row in rows {
        let row = row.map_err(|err| parse_error(source, &err))?;
        if is_blank(&row) {
            continue;
        }
        let mut record = RawRecord::new(RecordId(records.len() + 1));
        for (index, header) in headers.iter().enumerate() {
            if record.contains(header) {
                continue;
            }
            let cell = row.get(index).map(normalize_cell).unwrap_or_default();
            let value = if cell.is_empty() {
                Value::Null
            } else {
                Value::Text(cell)
            };
            record.set(header.clone(), value);
        }
        records.push(record);
    }

    tracing::debug!(
        path = %source.display(),
        columns = headers.len(),
        rows = records.len(),
        "read CSV records"
    );
    Ok(RawBatch { headers, records })
}

fn parse_error(source: &Path, err: &csv::Error) -> IngestError {
    IngestError::CsvParse {
        path: source.to_path_buf(),
        message: err.to_string(),
    }
}
