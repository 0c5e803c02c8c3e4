pub mod applications;
pub mod notifications;
pub mod scholarships;

use crate::config::AppConfig;
use crate::db;
use crate::error::StoreError;
use actix_web::{HttpResponse, ResponseError};
use common::responses::ServiceResponse;
use log::error;
use rusqlite::Connection;
use serde::Serialize;

/// Opens a connection to the configured database.
pub(crate) fn connect(config: &AppConfig) -> Result<Connection, StoreError> {
    db::open(&config.database.path)
}

/// Wraps a handler result in the `ServiceResponse` envelope, logging failures.
pub(crate) fn reply<T: Serialize, E: ResponseError>(action: &str, result: Result<T, E>) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(ServiceResponse::ok(data)),
        Err(err) => {
            error!("{} failed: {}", action, err);
            HttpResponse::build(err.status_code()).json(ServiceResponse::<()>::err(err.to_string()))
        }
    }
}
