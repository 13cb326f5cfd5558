//! People-directory API client.
//!
//! This crate provides:
//! - [`DirectorySource`] config enum for choosing between mock and live clients
//! - [`DirectoryClient`] trait for abstracting directory access
//! - [`HttpDirectoryClient`] production client that talks to the directory's REST API
//! - [`MockDirectoryClient`] mock client for testing with pre-configured records
//!
//! ## Usage with DirectorySource (Recommended)
//!
//! ```ignore
//! use directory_api::DirectorySource;
//!
//! // Development/testing: use mock records
//! let client = DirectorySource::mock(records).into_client();
//!
//! // Production: use the live API
//! let client = DirectorySource::live("https://directory.example.com", "id", "secret", 200)
//!     .into_client();
//!
//! client.authenticate().await?;
//! let page = client.fetch_page(1).await?;
//! ```

mod mock;

pub use mock::MockDirectoryClient;

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client as ReqwestClient;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use directory_indexer_shared::{EmployeeRecord, GeoPoint};

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

/// One page of employee records from the directory.
#[derive(Debug, Clone)]
pub struct DirectoryPage {
    pub records: Vec<EmployeeRecord>,
    /// 1-based page number of this page.
    pub page: u32,
    pub total_pages: u32,
}

impl DirectoryPage {
    /// Whether another page exists after this one.
    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Trait for fetching employee records from a people directory.
///
/// This trait abstracts the directory client to enable dependency injection
/// and mocking for testing. Production code uses [`HttpDirectoryClient`],
/// while tests can use [`MockDirectoryClient`].
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Exchange client credentials for an access token.
    ///
    /// Must be called once before [`fetch_page`](Self::fetch_page). Fails with
    /// [`DirectoryError::Authentication`] if the credentials are rejected.
    async fn authenticate(&self) -> Result<()>;

    /// Fetch one page of employee records. Pages are 1-based.
    async fn fetch_page(&self, page: u32) -> Result<DirectoryPage>;
}

/// Employee payload as returned by the directory API.
///
/// The office address arrives as an array of address lines; it is joined into
/// a single free-text string on conversion. Coordinates may already be present
/// upstream for offices the directory has resolved itself.
#[derive(Debug, Clone, Deserialize)]
struct RawEmployee {
    id: String,
    first_name: String,
    last_name: String,
    #[serde(default)]
    nickname: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    job_title: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    office: Vec<String>,
    #[serde(default)]
    start_date: Option<NaiveDate>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    #[serde(default)]
    custom_fields: HashMap<String, serde_json::Value>,
}

impl From<RawEmployee> for EmployeeRecord {
    fn from(raw: RawEmployee) -> Self {
        let office_location = if raw.office.is_empty() {
            None
        } else {
            Some(raw.office.join(", "))
        };
        let location = match (raw.latitude, raw.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint::new(lat, lon)),
            _ => None,
        };

        EmployeeRecord {
            id: raw.id,
            first_name: raw.first_name,
            last_name: raw.last_name,
            nickname: raw.nickname,
            email: raw.email,
            job_title: raw.job_title,
            department: raw.department,
            office_location,
            start_date: raw.start_date,
            location,
            custom_fields: raw.custom_fields,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    users: Vec<RawEmployee>,
    meta: PageMeta,
}

#[derive(Debug, Deserialize)]
struct PageMeta {
    page: u32,
    total_pages: u32,
}

/// Production directory client that talks to the REST API.
///
/// Authentication uses the OAuth client-credentials grant: the token obtained
/// by [`authenticate`](DirectoryClient::authenticate) is held for the lifetime
/// of the client and sent as a bearer token on every page fetch.
pub struct HttpDirectoryClient {
    base_url: String,
    client_id: String,
    client_secret: String,
    page_size: u32,
    email_filter: Option<String>,
    token: RwLock<Option<String>>,
    client: ReqwestClient,
}

impl HttpDirectoryClient {
    pub fn new(
        base_url: &str,
        client_id: &str,
        client_secret: &str,
        page_size: u32,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            page_size,
            email_filter: None,
            token: RwLock::new(None),
            client: ReqwestClient::new(),
        }
    }

    /// Restrict fetches to records matching the given email address.
    pub fn with_email_filter(mut self, email: Option<String>) -> Self {
        self.email_filter = email;
        self
    }

    fn bearer_token(&self) -> Result<String> {
        self.token
            .read()
            .unwrap()
            .clone()
            .ok_or_else(|| DirectoryError::Authentication("no access token; call authenticate() first".to_string()))
    }
}

#[async_trait]
impl DirectoryClient for HttpDirectoryClient {
    async fn authenticate(&self) -> Result<()> {
        let url = format!("{}/oauth/token?grant_type=client_credentials", self.base_url);
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];

        let res = self.client.post(&url).form(&params).send().await?;

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = res.text().await.unwrap_or_default();
            return Err(DirectoryError::Authentication(format!(
                "token exchange rejected with status {}: {}",
                status, body
            )));
        }
        let res = res.error_for_status()?;

        let body = res.text().await?;
        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| DirectoryError::Parse(format!("invalid token response: {}", e)))?;

        *self.token.write().unwrap() = Some(token.access_token);
        debug!("Directory token exchange succeeded");
        Ok(())
    }

    async fn fetch_page(&self, page: u32) -> Result<DirectoryPage> {
        let token = self.bearer_token()?;

        let mut url = format!(
            "{}/api/v2/users?page={}&page_size={}",
            self.base_url, page, self.page_size
        );
        if let Some(ref email) = self.email_filter {
            url.push_str(&format!("&email={}", email));
        }

        let res = self.client.get(&url).bearer_auth(&token).send().await?;

        let status = res.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = res.text().await.unwrap_or_default();
            return Err(DirectoryError::Authentication(format!(
                "page fetch rejected with status {}: {}",
                status, body
            )));
        }
        let res = res.error_for_status()?;

        let body = res.text().await?;
        let response: UsersResponse = serde_json::from_str(&body)
            .map_err(|e| DirectoryError::Parse(format!("invalid users response: {}", e)))?;

        debug!(
            page = response.meta.page,
            total_pages = response.meta.total_pages,
            record_count = response.users.len(),
            "Fetched directory page"
        );

        Ok(DirectoryPage {
            records: response.users.into_iter().map(EmployeeRecord::from).collect(),
            page: response.meta.page,
            total_pages: response.meta.total_pages,
        })
    }
}

/// Configuration for the directory data source.
///
/// Use this to explicitly choose between mock and live directory clients.
///
/// # Example
///
/// ```ignore
/// use directory_api::DirectorySource;
///
/// // Development/testing: use mock records
/// let client = DirectorySource::mock(records).into_client();
///
/// // Production: use the live API
/// let client = DirectorySource::live("https://directory.example.com", "id", "secret", 200)
///     .into_client();
/// ```
#[derive(Debug, Clone)]
pub enum DirectorySource {
    /// Use a mock client pre-populated with employee records.
    Mock(Vec<EmployeeRecord>),

    /// Connect to the live directory API.
    Live {
        base_url: String,
        client_id: String,
        client_secret: String,
        page_size: u32,
        email_filter: Option<String>,
    },
}

impl DirectorySource {
    /// Create a mock directory source with the given records.
    pub fn mock(records: Vec<EmployeeRecord>) -> Self {
        Self::Mock(records)
    }

    /// Create a live directory source with the given credentials.
    pub fn live(
        base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self::Live {
            base_url: base_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            page_size,
            email_filter: None,
        }
    }

    /// Restrict the live source to records matching the given email address.
    pub fn with_email_filter(mut self, email: Option<String>) -> Self {
        if let Self::Live {
            ref mut email_filter,
            ..
        } = self
        {
            *email_filter = email;
        }
        self
    }

    /// Create the appropriate DirectoryClient implementation.
    pub fn into_client(self) -> Box<dyn DirectoryClient> {
        match self {
            Self::Mock(records) => Box::new(MockDirectoryClient::with_records(records)),
            Self::Live {
                base_url,
                client_id,
                client_secret,
                page_size,
                email_filter,
            } => Box::new(
                HttpDirectoryClient::new(&base_url, &client_id, &client_secret, page_size)
                    .with_email_filter(email_filter),
            ),
        }
    }
}
