//! Fetcher stage for the directory sync.
//!
//! Pulls employee records from the people-directory API, one page at a time,
//! until the API reports exhaustion.

use std::sync::Arc;

use tracing::debug;

use directory_api::{DirectoryClient, DirectoryError, DirectoryPage};

/// Fetcher that pages through the directory.
///
/// The fetcher authenticates once per run and then pulls pages sequentially.
/// Errors from the client (rejected credentials, connectivity failure) are
/// propagated unchanged; there is no retry here.
pub struct Fetcher {
    client: Arc<dyn DirectoryClient>,
}

impl Fetcher {
    /// Create a new fetcher over the given directory client.
    pub fn new(client: Arc<dyn DirectoryClient>) -> Self {
        Self { client }
    }

    /// Exchange credentials for an access token.
    ///
    /// Must succeed before any page is fetched; a rejection aborts the run
    /// before anything is written to the index.
    pub async fn authenticate(&self) -> Result<(), DirectoryError> {
        self.client.authenticate().await
    }

    /// Fetch one page of employee records. Pages are 1-based.
    pub async fn fetch_page(&self, page: u32) -> Result<DirectoryPage, DirectoryError> {
        let directory_page = self.client.fetch_page(page).await?;

        debug!(
            page = directory_page.page,
            total_pages = directory_page.total_pages,
            record_count = directory_page.records.len(),
            "Fetched directory page"
        );

        Ok(directory_page)
    }
}
