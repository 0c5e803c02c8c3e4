//! Bulk import of applications from CSV.
//!
//! The pipeline runs in strict stages:
//! 1. [`parse_csv`] turns the upload into header-keyed rows.
//! 2. [`transform_row`] maps each row onto an [`Application`] and validates it.
//! 3. [`ImportPlan::from_parsed`] splits valid rows from invalid ones.
//! 4. The same call withholds rows whose email appears more than once.
//!
//! Checking against stored data and committing happen in the backend, which
//! feeds its findings back through [`ImportPlan::reject_where`].
//!
//! [`Application`]: crate::model::application::Application

mod plan;
mod template;
mod transform;

pub use plan::ImportPlan;
pub use template::{csv_template, TEMPLATE_FILE_NAME};
pub use transform::{canonical_column, transform_row, CSV_FIELD_MAPPINGS, CSV_HEADERS, REQUIRED_COLUMNS};

use csv::{ReaderBuilder, Trim};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CsvImportError {
    #[error("the file is empty")]
    Empty,
    #[error("the header row is missing or blank")]
    MissingHeaders,
    #[error("malformed CSV near line {line}: {message}")]
    Malformed { line: u64, message: String },
    #[error("could not write CSV: {0}")]
    Write(String),
}

impl From<csv::Error> for CsvImportError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or_default();
        CsvImportError::Malformed {
            line,
            message: err.to_string(),
        }
    }
}

/// One data row keyed by normalised header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// Line the record starts on; the header is line 1.
    pub row_number: usize,
    pub values: BTreeMap<String, String>,
}

impl CsvRow {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.values.get(header).map(String::as_str)
    }
}

/// Lowercases a header and joins its words with `_`.
pub fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

/// Stage 1. Any structural problem aborts the whole import.
pub fn parse_csv(input: &str) -> Result<Vec<CsvRow>, CsvImportError> {
    if input.trim().is_empty() {
        return Err(CsvImportError::Empty);
    }

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
    if headers.iter().all(String::is_empty) {
        return Err(CsvImportError::MissingHeaders);
    }

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let row_number = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(index + 2);
        let values = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, value)| (header.clone(), value.to_string()))
            .collect();
        rows.push(CsvRow { row_number, values });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_normalised() {
        assert_eq!(normalize_header("  First   Name "), "first_name");
        assert_eq!(normalize_header("\u{feff}Scholarship ID"), "scholarship_id");
    }

    #[test]
    fn rows_are_numbered_from_two() {
        let rows = parse_csv("First Name,EMAIL\nAda , ada@example.com\nGrace,grace@example.com\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[1].row_number, 3);
        assert_eq!(rows[0].get("first_name"), Some("Ada"));
        assert_eq!(rows[0].get("email"), Some("ada@example.com"));
    }

    #[test]
    fn quoted_newlines_keep_source_lines() {
        let rows = parse_csv("name,essay\na,\"line one\nline two\"\nb,short\n").unwrap();
        assert_eq!(rows[0].row_number, 2);
        assert_eq!(rows[1].row_number, 4);
    }

    #[test]
    fn ragged_rows_abort_the_import() {
        let err = parse_csv("a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, CsvImportError::Malformed { .. }));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(parse_csv("  \n"), Err(CsvImportError::Empty));
        assert_eq!(parse_csv(" , \n1,2\n"), Err(CsvImportError::MissingHeaders));
    }
}
