//! Employee document types for the search index.
//!
//! This module defines the document structure that is indexed in the search engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::geo::GeoPoint;

/// Document representation for the search index.
///
/// This struct represents an employee as it is stored in the search engine.
/// The document deliberately carries no index-time timestamp: a document built
/// from the same upstream record always serializes identically, so re-running
/// the sync over unchanged data is a no-op for the index.
///
/// # Fields
///
/// - `employee_id`: Stable identifier, also the document id (upsert key)
/// - `first_name` / `last_name`: Name fields (keyword, primary filters)
/// - `nickname`: Optional preferred name
/// - `email`: Optional work email
/// - `job_title`: Optional job title (full-text search field)
/// - `department`: Optional department (keyword)
/// - `office_location`: Optional free-text office address
/// - `location`: Optional resolved coordinates (`geo_point`)
/// - `started_at`: Optional employment start date
/// - `extra`: Custom fields projected per the configured field-mapping table,
///   flattened into the document body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployeeDocument {
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl EmployeeDocument {
    /// Create a new document with only the identity fields set.
    ///
    /// # Example
    ///
    /// ```
    /// use directory_indexer_shared::EmployeeDocument;
    ///
    /// let doc = EmployeeDocument::new("e42", "Ada", "Lovelace");
    /// assert_eq!(doc.document_id(), "e42");
    /// ```
    pub fn new(
        employee_id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            nickname: None,
            email: None,
            job_title: None,
            department: None,
            office_location: None,
            location: None,
            started_at: None,
            extra: serde_json::Map::new(),
        }
    }

    /// The document id used in the search index.
    ///
    /// The employee identifier is unique and stable across runs, so it is used
    /// directly as the upsert key.
    pub fn document_id(&self) -> &str {
        &self.employee_id
    }
}
