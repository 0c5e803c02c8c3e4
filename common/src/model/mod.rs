pub mod application;
pub mod csv;
pub mod scholarship;
