//! Typed settings for the directory sync.
//!
//! Settings are loaded from a YAML file once at startup, validated, and passed
//! explicitly into dependency wiring. Scalar values may reference environment
//! variables with `${VAR}`, which is resolved before parsing so secrets can
//! stay out of the file.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::SyncError;

/// Default number of records per directory page.
const DEFAULT_PAGE_SIZE: u32 = 200;

/// Default index alias.
const DEFAULT_INDEX_ALIAS: &str = "employees";

/// Top-level configuration for one sync run.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// People-directory API connection.
    pub directory: DirectorySettings,
    /// Geocoding API connection.
    pub geocode: GeocodeSettings,
    /// Search engine connection and index naming.
    pub search: SearchSettings,
    /// Custom directory fields to project into the index, keyed by the
    /// directory API's custom field key.
    #[serde(default)]
    pub custom_fields: HashMap<String, CustomFieldSettings>,
}

/// Directory API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectorySettings {
    /// Base URL of the directory API.
    pub base_url: String,
    /// OAuth client id for the client-credentials grant.
    pub client_id: String,
    /// OAuth client secret.
    pub client_secret: String,
    /// Records per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Geocoding API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeSettings {
    /// Geocoding endpoint URL.
    pub base_url: String,
    /// API key.
    pub api_key: String,
    /// Optional cap on outgoing geocode requests per second.
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

/// Search engine settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    /// Search engine URL (e.g., "http://localhost:9200").
    pub url: String,
    /// Index alias used for all document operations.
    #[serde(default = "default_index_alias")]
    pub index_alias: String,
    /// Index mapping version (the physical index is "{alias}_v{version}").
    #[serde(default)]
    pub index_version: u32,
    /// Optional basic auth username.
    #[serde(default)]
    pub username: Option<String>,
    /// Optional basic auth password.
    #[serde(default)]
    pub password: Option<String>,
}

/// Projection of one directory custom field into the index.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CustomFieldSettings {
    /// Field name in the index document.
    pub name: String,
    /// OpenSearch field type (e.g., "keyword", "text", "date").
    #[serde(rename = "type")]
    pub field_type: String,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_index_alias() -> String {
    DEFAULT_INDEX_ALIAS.to_string()
}

impl Settings {
    /// Load and validate settings from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SyncError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            SyncError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&raw)
    }

    /// Parse and validate settings from a YAML string.
    pub fn from_yaml(raw: &str) -> Result<Self, SyncError> {
        let interpolated = interpolate_env(raw)?;
        let settings: Settings = serde_yaml::from_str(&interpolated)
            .map_err(|e| SyncError::config(format!("Invalid configuration: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings before any network call is made.
    fn validate(&self) -> Result<(), SyncError> {
        if self.directory.base_url.is_empty() {
            return Err(SyncError::config("directory.base_url must not be empty"));
        }
        if self.directory.client_id.is_empty() || self.directory.client_secret.is_empty() {
            return Err(SyncError::config(
                "directory.client_id and directory.client_secret must not be empty",
            ));
        }
        if self.directory.page_size == 0 {
            return Err(SyncError::config("directory.page_size must be positive"));
        }
        if self.geocode.base_url.is_empty() || self.geocode.api_key.is_empty() {
            return Err(SyncError::config(
                "geocode.base_url and geocode.api_key must not be empty",
            ));
        }
        if self.search.url.is_empty() {
            return Err(SyncError::config("search.url must not be empty"));
        }
        if self.search.index_alias.is_empty() {
            return Err(SyncError::config("search.index_alias must not be empty"));
        }
        if self.search.username.is_some() != self.search.password.is_some() {
            return Err(SyncError::config(
                "search.username and search.password must be set together",
            ));
        }
        for (key, field) in &self.custom_fields {
            if field.name.is_empty() || field.field_type.is_empty() {
                return Err(SyncError::config(format!(
                    "custom field '{}' must have a name and a type",
                    key
                )));
            }
            if !field
                .name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_')
            {
                return Err(SyncError::config(format!(
                    "custom field name '{}' contains invalid characters. Only alphanumeric characters and underscores are allowed",
                    field.name
                )));
            }
        }
        Ok(())
    }
}

/// Resolve `${VAR}` references against the process environment.
///
/// Fails if a referenced variable is unset, so a missing secret is caught at
/// startup instead of surfacing as a rejected credential mid-run.
fn interpolate_env(input: &str) -> Result<String, SyncError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find('}').ok_or_else(|| {
            SyncError::config("Unterminated ${ in configuration".to_string())
        })?;
        let name = &after[..end];
        let value = env::var(name).map_err(|_| {
            SyncError::config(format!("Environment variable {} is not set", name))
        })?;
        out.push_str(&value);
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_YAML: &str = r#"
directory:
  base_url: https://directory.example.com
  client_id: id
  client_secret: secret
geocode:
  base_url: https://maps.example.com/geocode/json
  api_key: key
search:
  url: http://localhost:9200
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let settings = Settings::from_yaml(MINIMAL_YAML).unwrap();

        assert_eq!(settings.directory.page_size, 200);
        assert_eq!(settings.search.index_alias, "employees");
        assert_eq!(settings.search.index_version, 0);
        assert!(settings.geocode.requests_per_second.is_none());
        assert!(settings.custom_fields.is_empty());
    }

    #[test]
    fn test_full_config_parses() {
        let yaml = r#"
directory:
  base_url: https://directory.example.com
  client_id: id
  client_secret: secret
  page_size: 50
geocode:
  base_url: https://maps.example.com/geocode/json
  api_key: key
  requests_per_second: 50
search:
  url: http://localhost:9200
  index_alias: people
  index_version: 2
  username: admin
  password: admin
custom_fields:
  team_name:
    name: team
    type: keyword
"#;

        let settings = Settings::from_yaml(yaml).unwrap();

        assert_eq!(settings.directory.page_size, 50);
        assert_eq!(settings.geocode.requests_per_second, Some(50));
        assert_eq!(settings.search.index_alias, "people");
        assert_eq!(settings.search.index_version, 2);
        assert_eq!(
            settings.custom_fields["team_name"],
            CustomFieldSettings {
                name: "team".to_string(),
                field_type: "keyword".to_string(),
            }
        );
    }

    #[test]
    fn test_env_interpolation() {
        env::set_var("DIRECTORY_TEST_SECRET", "s3cret");

        let yaml = r#"
directory:
  base_url: https://directory.example.com
  client_id: id
  client_secret: ${DIRECTORY_TEST_SECRET}
geocode:
  base_url: https://maps.example.com/geocode/json
  api_key: key
search:
  url: http://localhost:9200
"#;

        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.directory.client_secret, "s3cret");
    }

    #[test]
    fn test_missing_env_var_is_an_error() {
        let yaml = r#"
directory:
  base_url: https://directory.example.com
  client_id: id
  client_secret: ${DIRECTORY_TEST_UNSET_VAR}
geocode:
  base_url: https://maps.example.com/geocode/json
  api_key: key
search:
  url: http://localhost:9200
"#;

        let result = Settings::from_yaml(yaml);
        assert!(matches!(result, Err(SyncError::ConfigError(_))));
    }

    #[test]
    fn test_interpolation_preserves_surrounding_text() {
        env::set_var("DIRECTORY_TEST_HOST", "search.internal");
        let out = interpolate_env("http://${DIRECTORY_TEST_HOST}:9200").unwrap();
        assert_eq!(out, "http://search.internal:9200");
    }

    #[test]
    fn test_unterminated_reference_is_an_error() {
        let result = interpolate_env("http://${DIRECTORY_TEST_HOST:9200");
        assert!(matches!(result, Err(SyncError::ConfigError(_))));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let yaml = MINIMAL_YAML.replace(
            "  client_secret: secret",
            "  client_secret: secret\n  page_size: 0",
        );
        let result = Settings::from_yaml(&yaml);
        assert!(matches!(result, Err(SyncError::ConfigError(_))));
    }

    #[test]
    fn test_username_without_password_is_rejected() {
        let yaml = MINIMAL_YAML.replace(
            "  url: http://localhost:9200",
            "  url: http://localhost:9200\n  username: admin",
        );
        let result = Settings::from_yaml(&yaml);
        assert!(matches!(result, Err(SyncError::ConfigError(_))));
    }

    #[test]
    fn test_invalid_custom_field_name_is_rejected() {
        let yaml = format!(
            "{}custom_fields:\n  team_name:\n    name: \"team name\"\n    type: keyword\n",
            MINIMAL_YAML
        );
        let result = Settings::from_yaml(&yaml);
        assert!(matches!(result, Err(SyncError::ConfigError(_))));
    }
}
