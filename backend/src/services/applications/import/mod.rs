//! Manages CSV bulk import of applications.
//!
//! The import runs the pipeline from `common::csv_import` and finishes it
//! against the database. It integrates with the asynchronous job system
//! (`job_controller`) so the commit does not block the server.
//!
//! The provided routes are:
//! - `POST /api/applications/import/preview`: multipart upload with a `file`
//!   field. The file is stored under its MD5 hash and run through parsing,
//!   validation, duplicate detection and the existing-data check. Nothing is
//!   written; the response lists the rows that would be imported and every
//!   row-level error.
//!
//! - `POST /api/applications/import/start`: takes the `upload_id` returned by
//!   the preview and starts a background job that reruns the checks and
//!   commits the valid rows in batches. Returns the job id immediately.
//!
//! - `GET /api/applications/import/status/{job_id}`: current `JobStatus` of an
//!   import job. `Completed` carries the `ImportResult` as JSON.
//!
//! - `GET /api/applications/import/template`: a CSV with the expected header
//!   row and one example row.

mod get_status;
pub mod pipeline;
mod preview;
mod start;
pub mod store;
mod template;
mod upload;

use crate::error::StoreError;
use actix_web::http::StatusCode;
use actix_web::web::{get, post, scope};
use actix_web::{ResponseError, Scope};
use common::csv_import::CsvImportError;
use thiserror::Error;

const API_PATH: &str = "/import";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Csv(#[from] CsvImportError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("upload could not be stored: {0}")]
    Io(#[from] std::io::Error),
    #[error("upload {0} not found, preview the file again")]
    UploadNotFound(String),
    #[error("upload {0} is already being imported")]
    AlreadyImporting(String),
    #[error("{0}")]
    Upload(String),
    #[error("background task failed: {0}")]
    Task(String),
}

impl ResponseError for ImportError {
    fn status_code(&self) -> StatusCode {
        match self {
            ImportError::Csv(_) | ImportError::Upload(_) => StatusCode::BAD_REQUEST,
            ImportError::UploadNotFound(_) => StatusCode::NOT_FOUND,
            ImportError::AlreadyImporting(_) => StatusCode::CONFLICT,
            ImportError::Store(e) => e.status_code(),
            ImportError::Io(_) | ImportError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Nested under the applications scope.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        // Route to validate an upload without writing anything.
        .route("/preview", post().to(preview::process))
        // Route to start committing a previewed upload.
        .route("/start", post().to(start::process))
        // Route to poll an import job.
        .route("/status/{job_id}", get().to(get_status::process))
        // Route to download the CSV template.
        .route("/template", get().to(template::process))
}
