//! OpenSearch index configuration and mappings.
//!
//! This module defines the index settings and mappings for the employee search index.

use serde_json::{json, Value};

/// A custom directory field projected into the index mapping.
///
/// The directory API exposes organization-specific custom fields; the
/// configuration maps each one to a document field name and an OpenSearch
/// field type, which is merged into the employee mapping at index creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomFieldMapping {
    /// Field name in the index document.
    pub name: String,
    /// OpenSearch field type (e.g., "keyword", "text", "date").
    pub field_type: String,
}

impl CustomFieldMapping {
    /// Create a new custom field mapping.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
        }
    }
}

/// Configuration for the search index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// The alias name for the search index (used for all document operations).
    pub alias: String,
    /// The version number for the index (e.g., 0 for "employees_v0").
    pub version: u32,
    /// Custom fields merged into the employee mapping.
    pub custom_fields: Vec<CustomFieldMapping>,
}

impl IndexConfig {
    /// Create a new index configuration.
    ///
    /// # Arguments
    ///
    /// * `alias` - The index alias name
    /// * `version` - The version number
    pub fn new(alias: impl Into<String>, version: u32) -> Self {
        Self {
            alias: alias.into(),
            version,
            custom_fields: Vec::new(),
        }
    }

    /// Merge the given custom fields into the index mapping.
    pub fn with_custom_fields(mut self, custom_fields: Vec<CustomFieldMapping>) -> Self {
        self.custom_fields = custom_fields;
        self
    }

    /// The versioned physical index name (e.g., "employees_v0").
    ///
    /// Documents are written through the alias; the versioned name is used for
    /// index creation and deletion so a new mapping version can be stood up
    /// alongside the old one.
    pub fn versioned_index_name(&self) -> String {
        format!("{}_v{}", self.alias, self.version)
    }
}

/// Get the index settings and mappings for the employee search index.
///
/// The configuration includes:
/// - **Keyword fields**: For filtering and exact lookups (ids, names, email, department)
/// - **text**: Full-text search on job title and office address
/// - **geo_point**: The resolved office coordinates, for geo queries
/// - **date**: Employment start date
///
/// Custom fields from the configuration are merged into the mapping with
/// their configured types.
///
/// # Sharding Configuration
///
/// - 1 primary shard
/// - 1 replica for redundancy
pub fn get_index_settings(custom_fields: &[CustomFieldMapping]) -> Value {
    let mut properties = json!({
        "employee_id": {
            "type": "keyword"
        },
        "first_name": {
            "type": "keyword"
        },
        "last_name": {
            "type": "keyword"
        },
        "nickname": {
            "type": "keyword"
        },
        "email": {
            "type": "keyword"
        },
        "department": {
            "type": "keyword"
        },
        "job_title": {
            "type": "text"
        },
        "office_location": {
            "type": "text"
        },
        "location": {
            "type": "geo_point"
        },
        "started_at": {
            "type": "date"
        }
    });

    for field in custom_fields {
        properties[field.name.as_str()] = json!({ "type": field.field_type });
    }

    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": properties
        }
    })
}
