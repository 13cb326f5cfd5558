//! Mock directory client for testing and local development.
//!
//! The `MockDirectoryClient` serves pre-configured employee records in pages,
//! allowing tests to run without network access. Authentication is simulated:
//! fetching a page before authenticating fails, and the mock can be configured
//! to reject credentials outright.

use std::sync::RwLock;

use async_trait::async_trait;

use directory_indexer_shared::EmployeeRecord;

use crate::{DirectoryClient, DirectoryError, DirectoryPage, Result};

const DEFAULT_PAGE_SIZE: usize = 100;

/// Mock directory client that returns pre-configured employee records.
///
/// Use this for testing and local development without network access.
pub struct MockDirectoryClient {
    records: Vec<EmployeeRecord>,
    page_size: usize,
    fail_authentication: bool,
    email_filter: Option<String>,
    authenticated: RwLock<bool>,
}

impl MockDirectoryClient {
    /// Create a new empty mock client.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            fail_authentication: false,
            email_filter: None,
            authenticated: RwLock::new(false),
        }
    }

    /// Create a mock client pre-populated with the given records.
    pub fn with_records(records: Vec<EmployeeRecord>) -> Self {
        Self {
            records,
            ..Self::new()
        }
    }

    /// Serve records in pages of the given size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        self.page_size = page_size;
        self
    }

    /// Reject the credential exchange, simulating invalid credentials.
    pub fn with_auth_failure(mut self) -> Self {
        self.fail_authentication = true;
        self
    }

    /// Restrict served records to those matching the given email address.
    pub fn with_email_filter(mut self, email: Option<String>) -> Self {
        self.email_filter = email;
        self
    }

    fn filtered_records(&self) -> Vec<EmployeeRecord> {
        match self.email_filter {
            Some(ref email) => self
                .records
                .iter()
                .filter(|r| r.email.as_deref() == Some(email.as_str()))
                .cloned()
                .collect(),
            None => self.records.clone(),
        }
    }
}

impl Default for MockDirectoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryClient for MockDirectoryClient {
    async fn authenticate(&self) -> Result<()> {
        if self.fail_authentication {
            return Err(DirectoryError::Authentication(
                "mock credentials rejected".to_string(),
            ));
        }
        *self.authenticated.write().unwrap() = true;
        Ok(())
    }

    async fn fetch_page(&self, page: u32) -> Result<DirectoryPage> {
        if !*self.authenticated.read().unwrap() {
            return Err(DirectoryError::Authentication(
                "no access token; call authenticate() first".to_string(),
            ));
        }

        let records = self.filtered_records();
        let total_pages = (records.len().div_ceil(self.page_size)).max(1) as u32;
        let start = (page.saturating_sub(1) as usize) * self.page_size;
        let page_records: Vec<EmployeeRecord> = records
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();

        Ok(DirectoryPage {
            records: page_records,
            page,
            total_pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, email: &str) -> EmployeeRecord {
        let mut r = EmployeeRecord::new(id, "Test", "Person");
        r.email = Some(email.to_string());
        r
    }

    #[tokio::test]
    async fn test_fetch_before_authenticate_fails() {
        let client = MockDirectoryClient::with_records(vec![record("e1", "a@example.com")]);

        let result = client.fetch_page(1).await;
        assert!(matches!(result, Err(DirectoryError::Authentication(_))));
    }

    #[tokio::test]
    async fn test_auth_failure() {
        let client = MockDirectoryClient::new().with_auth_failure();

        let result = client.authenticate().await;
        assert!(matches!(result, Err(DirectoryError::Authentication(_))));
    }

    #[tokio::test]
    async fn test_pagination() {
        let records = vec![
            record("e1", "a@example.com"),
            record("e2", "b@example.com"),
            record("e3", "c@example.com"),
        ];
        let client = MockDirectoryClient::with_records(records).with_page_size(2);
        client.authenticate().await.unwrap();

        let first = client.fetch_page(1).await.unwrap();
        assert_eq!(first.records.len(), 2);
        assert_eq!(first.total_pages, 2);
        assert!(first.has_more());

        let second = client.fetch_page(2).await.unwrap();
        assert_eq!(second.records.len(), 1);
        assert!(!second.has_more());
    }

    #[tokio::test]
    async fn test_empty_directory_is_one_empty_page() {
        let client = MockDirectoryClient::new();
        client.authenticate().await.unwrap();

        let page = client.fetch_page(1).await.unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_more());
    }

    #[tokio::test]
    async fn test_email_filter() {
        let records = vec![
            record("e1", "a@example.com"),
            record("e2", "b@example.com"),
        ];
        let client = MockDirectoryClient::with_records(records)
            .with_email_filter(Some("b@example.com".to_string()));
        client.authenticate().await.unwrap();

        let page = client.fetch_page(1).await.unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].id, "e2");
    }
}
