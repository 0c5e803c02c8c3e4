//! Domain library shared by the portal backend and the browser frontend.
//!
//! Everything in here is pure: no I/O, no database, no HTTP. The backend wraps
//! these types with persistence and the frontend drives them from the UI.
//!
//! - [`model`]: scholarships, applications and CSV import records.
//! - [`schema`]: the form schema engine (sections, fields, catalog, templates,
//!   legacy migration).
//! - [`wizard`]: step derivation, validation and the wizard state machine.
//! - [`csv_import`]: the parse, transform and deduplicate stages of bulk import.
//! - [`jobs`], [`requests`], [`responses`]: wire types for the HTTP API.

pub mod csv_import;
pub mod jobs;
pub mod model;
pub mod requests;
pub mod responses;
pub mod schema;
pub mod wizard;
