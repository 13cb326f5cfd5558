//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use directory_indexer_shared::EmployeeDocument;

use crate::errors::SearchIndexError;

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// This trait defines the interface for all search index backend implementations.
/// Implementations are injected into the index writer to enable dependency
/// injection and easy testing with mock implementations.
///
/// # Note on Document Creation
///
/// There is no separate `create_document` function. `upsert_document` creates
/// the document if it doesn't exist, or replaces its fields if it does, keyed
/// by the stable employee identifier. Re-running a sync over unchanged
/// upstream data therefore leaves the index semantically unchanged.
///
/// # Index Initialization
///
/// Implementations should call `ensure_index_exists` during startup so the
/// index and its mapping are in place before any document operations.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Ensure the search index and its alias exist, creating them if necessary.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index is ready for use
    /// * `Err(SearchIndexError)` - If initialization fails
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError>;

    /// Delete the search index if it exists and create it anew.
    ///
    /// Used when the mapping has changed and the index must be rebuilt from
    /// scratch. All previously indexed documents are lost.
    async fn recreate_index(&self) -> Result<(), SearchIndexError>;

    /// Upsert a document, keyed by the employee identifier.
    ///
    /// If the document exists its fields are replaced with the ones provided;
    /// otherwise it is created.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was written
    /// * `Err(SearchIndexError)` - If the operation fails; `Unavailable` means
    ///   the engine is unreachable and the run should abort
    async fn upsert_document(&self, document: &EmployeeDocument) -> Result<(), SearchIndexError>;
}
