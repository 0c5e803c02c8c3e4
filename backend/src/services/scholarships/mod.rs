//! # Scholarship Service Module
//!
//! Routes under `/api/scholarships`:
//! - `GET /`: every scholarship, sorted by name.
//! - `GET /{id}`: one scholarship.
//! - `POST /save`: creates or updates a scholarship. A missing id is generated;
//!   a stored form schema must pass `FormSchema::validate`.
//! - `GET /{id}/form_schema`: the schema the builder edits. Scholarships that
//!   only have legacy custom fields get them migrated into sections here.
//! - `POST /{id}/form_schema`: persists a validated schema.

mod form_schema;
mod get;
mod list;
mod save;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/scholarships";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", get().to(list::process))
        .route("/save", post().to(save::process))
        .route("/{id}/form_schema", get().to(form_schema::get))
        .route("/{id}/form_schema", post().to(form_schema::save))
        .route("/{id}", get().to(get::process))
}
