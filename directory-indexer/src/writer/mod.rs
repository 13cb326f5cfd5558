//! Writer stage for the directory sync.
//!
//! Builds index documents from enriched records and upserts them into the
//! search engine, keyed by the employee identifier.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use directory_indexer_repository::{SearchIndexError, SearchIndexProvider};
use directory_indexer_shared::{EmployeeDocument, EmployeeRecord};

/// Writer that upserts employee documents into the search index.
///
/// The writer owns the custom-field projection table (directory custom field
/// key → document field name) from the configuration. Documents are written
/// one at a time; the first failure aborts the run, there is no partial-write
/// recovery.
pub struct IndexWriter {
    provider: Arc<dyn SearchIndexProvider>,
    /// Directory custom field key → document field name.
    custom_fields: HashMap<String, String>,
    documents_written: u64,
}

impl IndexWriter {
    /// Create a new writer over the given provider.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            custom_fields: HashMap::new(),
            documents_written: 0,
        }
    }

    /// Project the given directory custom fields into the documents.
    pub fn with_custom_fields(mut self, custom_fields: HashMap<String, String>) -> Self {
        self.custom_fields = custom_fields;
        self
    }

    /// Make sure the index is ready before the first write.
    ///
    /// With `recreate` set, the index is dropped and created anew, losing all
    /// previously indexed documents; otherwise it is created only if absent.
    pub async fn prepare_index(&self, recreate: bool) -> Result<(), SearchIndexError> {
        if recreate {
            self.provider.recreate_index().await
        } else {
            self.provider.ensure_index_exists().await
        }
    }

    /// Build the index document for one record.
    ///
    /// Custom fields without a configured projection are dropped; null values
    /// are dropped as well, matching what the directory returns for unset
    /// fields.
    pub fn build_document(&self, record: &EmployeeRecord) -> EmployeeDocument {
        let mut document =
            EmployeeDocument::new(&record.id, &record.first_name, &record.last_name);
        document.nickname = record.nickname.clone();
        document.email = record.email.clone();
        document.job_title = record.job_title.clone();
        document.department = record.department.clone();
        document.office_location = record.office_location.clone();
        document.location = record.location;
        document.started_at = record.start_date;

        for (key, name) in &self.custom_fields {
            if let Some(value) = record.custom_fields.get(key) {
                if !value.is_null() {
                    document.extra.insert(name.clone(), value.clone());
                }
            }
        }

        document
    }

    /// Build and upsert the document for one record.
    pub async fn write(&mut self, record: &EmployeeRecord) -> Result<(), SearchIndexError> {
        let document = self.build_document(record);
        self.provider.upsert_document(&document).await?;
        self.documents_written += 1;

        debug!(doc_id = %document.document_id(), "Upserted employee document");
        Ok(())
    }

    /// Number of documents written so far this run.
    pub fn documents_written(&self) -> u64 {
        self.documents_written
    }
}
