//! Dependency initialization and wiring for the directory sync.

use std::sync::Arc;

use tracing::info;

use directory_api::DirectorySource;
use directory_indexer_repository::{CustomFieldMapping, IndexConfig, OpenSearchProvider};
use geocode::GeocodeSource;

use crate::config::Settings;
use crate::enricher::Enricher;
use crate::errors::SyncError;
use crate::fetcher::Fetcher;
use crate::orchestrator::Orchestrator;
use crate::writer::IndexWriter;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Wire up all stages from validated settings.
    ///
    /// # Arguments
    ///
    /// * `settings` - Validated settings loaded at startup
    /// * `email_filter` - Restrict the run to the employee with this email
    /// * `recreate_index` - Drop and recreate the index before writing
    pub fn new(
        settings: Settings,
        email_filter: Option<String>,
        recreate_index: bool,
    ) -> Result<Self, SyncError> {
        info!(
            directory_url = %settings.directory.base_url,
            geocode_url = %settings.geocode.base_url,
            search_url = %settings.search.url,
            index_alias = %settings.search.index_alias,
            index_version = settings.search.index_version,
            "Initializing dependencies"
        );

        let directory_client = DirectorySource::live(
            &settings.directory.base_url,
            &settings.directory.client_id,
            &settings.directory.client_secret,
            settings.directory.page_size,
        )
        .with_email_filter(email_filter)
        .into_client();

        let geocoder = GeocodeSource::live(&settings.geocode.base_url, &settings.geocode.api_key)
            .with_requests_per_second(settings.geocode.requests_per_second)
            .into_geocoder();

        let custom_field_mappings = settings
            .custom_fields
            .values()
            .map(|field| CustomFieldMapping::new(&field.name, &field.field_type))
            .collect();
        let index_config =
            IndexConfig::new(&settings.search.index_alias, settings.search.index_version)
                .with_custom_fields(custom_field_mappings);

        let provider = match (&settings.search.username, &settings.search.password) {
            (Some(username), Some(password)) => OpenSearchProvider::with_basic_auth(
                &settings.search.url,
                index_config,
                username,
                password,
            )?,
            _ => OpenSearchProvider::new(&settings.search.url, index_config)?,
        };

        let custom_field_names = settings
            .custom_fields
            .into_iter()
            .map(|(key, field)| (key, field.name))
            .collect();

        let fetcher = Fetcher::new(Arc::from(directory_client));
        let enricher = Enricher::new(Arc::from(geocoder));
        let writer = IndexWriter::new(Arc::new(provider)).with_custom_fields(custom_field_names);

        let orchestrator =
            Orchestrator::new(fetcher, enricher, writer).with_recreate_index(recreate_index);

        Ok(Self { orchestrator })
    }
}
