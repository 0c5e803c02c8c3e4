pub mod csv_import;
pub mod form_builder;
pub mod review;
pub mod wizard;
