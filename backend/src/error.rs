use actix_web::http::StatusCode;
use actix_web::ResponseError;
use common::model::application::ApplicationStatus;
use common::schema::SchemaError;
use thiserror::Error;

/// Failures of the persistence layer and the rules enforced around it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("stored JSON could not be read: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("cannot change status from {from} to {to}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    #[error("this application is under review and can no longer be changed")]
    Locked,
    #[error("invalid form schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("{0}")]
    Invalid(String),
}

impl ResponseError for StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::Database(_) | StoreError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::InvalidTransition { .. } | StoreError::Locked => StatusCode::CONFLICT,
            StoreError::Schema(_) | StoreError::Invalid(_) => StatusCode::BAD_REQUEST,
        }
    }
}
