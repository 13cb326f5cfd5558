//! # Directory Indexer Shared
//!
//! This crate defines shared data structures and types used across the directory
//! indexer ecosystem. It includes the employee record as fetched from the people
//! directory and the document shape written to the search index.

pub mod types;

pub use types::employee_document::EmployeeDocument;
pub use types::employee_record::EmployeeRecord;
pub use types::geo::GeoPoint;
