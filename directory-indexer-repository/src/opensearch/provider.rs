//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust crate.

use async_trait::async_trait;
use opensearch::{
    auth::Credentials,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesPutAliasParts},
    OpenSearch, UpdateParts,
};
use serde_json::json;
use tracing::{debug, error, info};
use url::Url;

use directory_indexer_shared::EmployeeDocument;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::{get_index_settings, IndexConfig};

/// OpenSearch provider implementation.
///
/// Documents are written through the configured alias; the versioned physical
/// index is created on demand with the employee mapping.
///
/// # Example
///
/// ```ignore
/// use directory_indexer_repository::opensearch::IndexConfig;
///
/// let config = IndexConfig::new("employees", 0);
/// let provider = OpenSearchProvider::new("http://localhost:9200", config)?;
///
/// provider.ensure_index_exists().await?;
/// provider.upsert_document(&document).await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index_config: IndexConfig,
}

impl OpenSearchProvider {
    /// Create a new OpenSearch provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index_config` - The index configuration containing alias, version,
    ///   and custom field mappings
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchProvider)` - A new provider instance
    /// * `Err(SearchIndexError)` - If connection setup fails
    pub fn new(url: &str, index_config: IndexConfig) -> Result<Self, SearchIndexError> {
        Self::connect(url, index_config, None)
    }

    /// Create a provider that authenticates with HTTP basic auth.
    pub fn with_basic_auth(
        url: &str,
        index_config: IndexConfig,
        username: &str,
        password: &str,
    ) -> Result<Self, SearchIndexError> {
        Self::connect(
            url,
            index_config,
            Some(Credentials::Basic(username.to_string(), password.to_string())),
        )
    }

    fn connect(
        url: &str,
        index_config: IndexConfig,
        credentials: Option<Credentials>,
    ) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::unavailable(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let mut builder = TransportBuilder::new(conn_pool).disable_proxy();
        if let Some(credentials) = credentials {
            builder = builder.auth(credentials);
        }
        let transport = builder
            .build()
            .map_err(|e| SearchIndexError::unavailable(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(
            url = %url,
            alias = %index_config.alias,
            version = index_config.version,
            "Created OpenSearch provider"
        );

        Ok(Self {
            client,
            index_config,
        })
    }

    /// Check whether the versioned index already exists.
    async fn index_exists(&self) -> Result<bool, SearchIndexError> {
        let index_name = self.index_config.versioned_index_name();

        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[&index_name]))
            .send()
            .await
            .map_err(|e| SearchIndexError::unavailable(e.to_string()))?;

        Ok(response.status_code().is_success())
    }

    /// Create the versioned index with the employee mapping and alias it.
    async fn create_index(&self) -> Result<(), SearchIndexError> {
        let index_name = self.index_config.versioned_index_name();
        let body = get_index_settings(&self.index_config.custom_fields);

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&index_name))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::unavailable(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index creation failed");
            if status.is_server_error() {
                return Err(SearchIndexError::unavailable(format!(
                    "Index creation failed with status {}: {}",
                    status, error_body
                )));
            }
            return Err(SearchIndexError::index_creation(format!(
                "Index creation failed with status {}: {}",
                status, error_body
            )));
        }

        let response = self
            .client
            .indices()
            .put_alias(IndicesPutAliasParts::IndexName(
                &[&index_name],
                &self.index_config.alias,
            ))
            .send()
            .await
            .map_err(|e| SearchIndexError::unavailable(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Alias creation failed");
            return Err(SearchIndexError::index_creation(format!(
                "Alias creation failed with status {}: {}",
                status, error_body
            )));
        }

        info!(
            index = %index_name,
            alias = %self.index_config.alias,
            "Created index and alias"
        );
        Ok(())
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    async fn ensure_index_exists(&self) -> Result<(), SearchIndexError> {
        if self.index_exists().await? {
            debug!(
                index = %self.index_config.versioned_index_name(),
                "Index already exists"
            );
            return Ok(());
        }
        self.create_index().await
    }

    async fn recreate_index(&self) -> Result<(), SearchIndexError> {
        let index_name = self.index_config.versioned_index_name();

        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[&index_name]))
            .send()
            .await
            .map_err(|e| SearchIndexError::unavailable(e.to_string()))?;

        let status = response.status_code();

        // 404 is acceptable - the index may not exist yet
        if !status.is_success() && status.as_u16() != 404 {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Index deletion failed");
            return Err(SearchIndexError::index_creation(format!(
                "Index deletion failed with status {}: {}",
                status, error_body
            )));
        }

        info!(index = %index_name, "Deleted index for recreation");
        self.create_index().await
    }

    /// Upsert a document keyed by the employee identifier.
    ///
    /// Uses the update API with `doc_as_upsert`: the document is created if it
    /// doesn't exist, or its fields are replaced if it does. Every field is
    /// sent on every run, so the operation is idempotent over unchanged input.
    ///
    /// API reference: https://docs.opensearch.org/latest/api-reference/document-apis/update-document/#using-the-upsert-operation
    async fn upsert_document(&self, document: &EmployeeDocument) -> Result<(), SearchIndexError> {
        if document.employee_id.is_empty() {
            return Err(SearchIndexError::validation(
                "Document is missing an employee identifier",
            ));
        }

        let doc = serde_json::to_value(document)
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        let response = self
            .client
            .update(UpdateParts::IndexId(
                &self.index_config.alias,
                document.document_id(),
            ))
            .body(json!({
                "doc": doc,
                "doc_as_upsert": true
            }))
            .send()
            .await
            .map_err(|e| SearchIndexError::unavailable(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Upsert request failed");
            if status.is_server_error() {
                return Err(SearchIndexError::unavailable(format!(
                    "Upsert failed with status {}: {}",
                    status, error_body
                )));
            }
            return Err(SearchIndexError::upsert(format!(
                "Upsert failed with status {}: {}",
                status, error_body
            )));
        }

        debug!(doc_id = %document.document_id(), "Document upserted");
        Ok(())
    }
}
