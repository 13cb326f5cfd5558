//! Employee record types for the directory sync.
//!
//! This module defines the record shape produced by the directory fetcher.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::geo::GeoPoint;

/// An employee record as fetched from the people-directory API.
///
/// The `id` is the directory's stable employee identifier and is used as the
/// document id in the search index, so it must be unique within a run.
///
/// # Fields
///
/// - `id`: Stable unique identifier assigned by the directory
/// - `first_name` / `last_name`: Display name components
/// - `nickname`: Optional preferred name
/// - `email`: Optional work email address
/// - `job_title`: Optional free-text job title
/// - `department`: Optional department name
/// - `office_location`: Optional free-text office address (geocoding input)
/// - `start_date`: Optional employment start date
/// - `location`: Optional coordinates already present upstream
/// - `custom_fields`: Raw custom fields from the directory, projected into the
///   index document according to the configured field-mapping table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmployeeRecord {
    pub id: String,
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
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub custom_fields: HashMap<String, serde_json::Value>,
}

impl EmployeeRecord {
    /// Create a record with only the required identity fields set.
    pub fn new(
        id: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            nickname: None,
            email: None,
            job_title: None,
            department: None,
            office_location: None,
            start_date: None,
            location: None,
            custom_fields: HashMap::new(),
        }
    }

    /// The name shown in search results: "First Last".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
