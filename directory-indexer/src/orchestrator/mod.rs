//! Orchestrator module for the directory sync.
//!
//! Drives the fetcher, enricher, and writer through one sequential run.

use tracing::{info, instrument};

use crate::enricher::Enricher;
use crate::errors::SyncError;
use crate::fetcher::Fetcher;
use crate::writer::IndexWriter;

/// Counters reported at the end of a run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RunSummary {
    /// Employee records fetched from the directory.
    pub records_fetched: u64,
    /// Lookups sent to the geocoding API.
    pub geocode_lookups: u64,
    /// Lookups answered from the per-run cache.
    pub geocode_cache_hits: u64,
    /// Addresses the geocoding API could not resolve.
    pub addresses_unresolved: u64,
    /// Documents upserted into the search index.
    pub documents_written: u64,
}

/// Orchestrator that runs the fetch-enrich-write pipeline once.
///
/// The run is strictly sequential: the index is prepared, the fetcher
/// authenticates, then each page of records is enriched and written before
/// the next page is fetched. The first fatal error aborts the run; per-record
/// conditions are absorbed by the enricher.
pub struct Orchestrator {
    fetcher: Fetcher,
    enricher: Enricher,
    writer: IndexWriter,
    recreate_index: bool,
}

impl Orchestrator {
    /// Create a new orchestrator with the given stages.
    pub fn new(fetcher: Fetcher, enricher: Enricher, writer: IndexWriter) -> Self {
        Self {
            fetcher,
            enricher,
            writer,
            recreate_index: false,
        }
    }

    /// Drop and recreate the index at the start of the run.
    pub fn with_recreate_index(mut self, recreate_index: bool) -> Self {
        self.recreate_index = recreate_index;
        self
    }

    /// Run the sync once.
    #[instrument(skip(self))]
    pub async fn run(&mut self) -> Result<RunSummary, SyncError> {
        info!("Starting directory sync run");

        self.writer.prepare_index(self.recreate_index).await?;

        // Authentication happens before any document write, so rejected
        // credentials leave the index untouched.
        self.fetcher.authenticate().await?;

        let mut records_fetched: u64 = 0;
        let mut page = 1;

        loop {
            let directory_page = self.fetcher.fetch_page(page).await?;
            records_fetched += directory_page.records.len() as u64;
            let has_more = directory_page.has_more();

            let enriched = self.enricher.enrich_page(directory_page.records).await?;
            for record in &enriched {
                self.writer.write(record).await?;
            }

            if !has_more {
                break;
            }
            page += 1;
        }

        let stats = self.enricher.stats();
        let summary = RunSummary {
            records_fetched,
            geocode_lookups: stats.lookups,
            geocode_cache_hits: stats.cache_hits,
            addresses_unresolved: stats.unresolved,
            documents_written: self.writer.documents_written(),
        };

        info!(
            records_fetched = summary.records_fetched,
            geocode_lookups = summary.geocode_lookups,
            geocode_cache_hits = summary.geocode_cache_hits,
            addresses_unresolved = summary.addresses_unresolved,
            documents_written = summary.documents_written,
            "Directory sync run complete"
        );

        Ok(summary)
    }
}
