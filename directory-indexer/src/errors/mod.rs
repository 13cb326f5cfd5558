//! Error types for the directory sync.

use thiserror::Error;

use directory_api::DirectoryError;
use directory_indexer_repository::SearchIndexError;
use geocode::GeocodeError;

/// Errors that can abort a sync run.
///
/// Every variant is fatal: the run stops and the process exits non-zero.
/// Per-record conditions (an unresolvable address) are handled inside the
/// enricher and never surface here.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Directory API error (failed authentication or connectivity).
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Geocoding error (quota exhausted or connectivity).
    #[error("Geocode error: {0}")]
    Geocode(#[from] GeocodeError),

    /// Search index error (engine unreachable or write failure).
    #[error("Search index error: {0}")]
    SearchIndex(#[from] SearchIndexError),
}

impl SyncError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
