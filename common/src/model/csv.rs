//! Records produced by the CSV bulk import pipeline.
//!
//! A [`ParsedApplication`] is an application-shaped row annotated with its
//! source line and the problems found while validating it. The annotations
//! are serialized as `_rowNumber` / `_errors` so the preview table can show
//! them next to the data, and are stripped before anything is written.

use crate::model::application::Application;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedApplication {
    /// 1-indexed line in the uploaded file; the header is line 1.
    #[serde(rename = "_rowNumber")]
    pub row_number: usize,
    #[serde(rename = "_errors", default)]
    pub errors: Vec<String>,
    #[serde(flatten)]
    pub application: Application,
}

impl ParsedApplication {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_application(self) -> Application {
        self.application
    }
}

/// One row-level problem, as listed in the preview's errors tab and in the
/// final import report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRowError {
    pub row: usize,
    pub message: String,
}

impl ImportRowError {
    pub fn new(row: usize, message: impl Into<String>) -> Self {
        Self {
            row,
            message: message.into(),
        }
    }
}

/// What the admin sees before committing: the rows that would be written and
/// every problem found in the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportPreview {
    /// Handle of the stored upload, passed back to start the import.
    pub upload_id: String,
    pub processed_count: usize,
    pub valid_rows: Vec<ParsedApplication>,
    pub errors: Vec<ImportRowError>,
}

/// Outcome of a committed import.
///
/// `success` only means at least one row was written; inspect `error_count`
/// for partial failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportResult {
    pub success: bool,
    pub processed_count: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<ImportRowError>,
}

impl ImportResult {
    pub fn new(processed_count: usize, success_count: usize, errors: Vec<ImportRowError>) -> Self {
        Self {
            success: success_count > 0,
            processed_count,
            success_count,
            error_count: errors.len(),
            errors,
        }
    }
}
