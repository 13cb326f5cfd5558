//! This module defines the core data structures used across the directory indexer.
//! It re-exports `EmployeeRecord`, `EmployeeDocument`, and `GeoPoint`.

pub mod employee_document;
pub mod employee_record;
pub mod geo;

pub use employee_document::EmployeeDocument;
pub use employee_record::EmployeeRecord;
pub use geo::GeoPoint;
