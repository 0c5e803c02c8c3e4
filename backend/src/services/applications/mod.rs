//! # Application Service Module
//!
//! Routes under `/api/applications`:
//! - `GET /?scholarship_id=&status=`: admin list.
//! - `GET /draft/{scholarship_id}/{applicant_id}`: the applicant's live
//!   application, or `null`.
//! - `POST /draft`, `POST /submit`: upsert on `(scholarship_id, applicant_id)`.
//! - `GET /{id}`: one application.
//! - `POST /{id}/status`, `/{id}/award`, `/{id}/remove_award`: admin review.
//! - `/import/...`: CSV bulk import, see [`import`].

mod draft;
mod get;
pub mod import;
mod list;
mod review;
mod submit;

use actix_web::web::{get, post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/applications";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .service(import::configure_routes())
        .route("", get().to(list::process))
        .route("/draft", post().to(draft::save))
        .route("/draft/{scholarship_id}/{applicant_id}", get().to(draft::get))
        .route("/submit", post().to(submit::process))
        .route("/{id}/status", post().to(review::status))
        .route("/{id}/award", post().to(review::award))
        .route("/{id}/remove_award", post().to(review::remove_award))
        .route("/{id}", get().to(get::process))
}
