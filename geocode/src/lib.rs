//! Geocoding API client.
//!
//! This crate provides:
//! - [`GeocodeSource`] config enum for choosing between mock and live clients
//! - [`Geocoder`] trait for abstracting geocoding access
//! - [`HttpGeocodeClient`] production client for a maps-style geocoding endpoint
//! - [`MockGeocoder`] mock client for testing with pre-configured lookups
//!
//! ## Usage with GeocodeSource (Recommended)
//!
//! ```ignore
//! use geocode::GeocodeSource;
//! use std::collections::HashMap;
//!
//! // Development/testing: use mock lookups
//! let geocoder = GeocodeSource::mock(lookups).into_geocoder();
//!
//! // Production: use a live endpoint
//! let geocoder = GeocodeSource::live("https://maps.example.com/geocode/json", "api-key")
//!     .into_geocoder();
//!
//! let coords = geocoder.geocode("1600 Amphitheatre Pkwy, Mountain View, CA").await?;
//! ```

mod mock;

pub use mock::MockGeocoder;

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::time::{sleep, Instant};
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("address not found: {0}")]
    NotFound(String),
    #[error("rate limit exceeded: {0}")]
    RateLimit(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, GeocodeError>;

/// Coordinates as returned by the geocoding API.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Trait for resolving free-text addresses to coordinates.
///
/// This trait abstracts the geocoding client to enable dependency injection
/// and mocking for testing. Production code uses [`HttpGeocodeClient`], while
/// tests can use [`MockGeocoder`].
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve an address string to coordinates.
    ///
    /// Fails with [`GeocodeError::NotFound`] if the address is unresolvable and
    /// [`GeocodeError::RateLimit`] if the upstream quota is exhausted.
    async fn geocode(&self, address: &str) -> Result<Coordinates>;
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeHit>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeHit {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Coordinates,
}

/// Production geocoding client for a maps-style REST endpoint.
///
/// Supports optional request pacing: with a requests-per-second cap set, the
/// client sleeps between calls so the upstream quota is never exceeded in the
/// first place. This is pacing only; there is no retry on failure.
pub struct HttpGeocodeClient {
    base_url: String,
    api_key: String,
    min_interval: Option<Duration>,
    last_request: Mutex<Option<Instant>>,
    client: ReqwestClient,
}

impl HttpGeocodeClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            min_interval: None,
            last_request: Mutex::new(None),
            client: ReqwestClient::new(),
        }
    }

    /// Cap outgoing requests at the given rate.
    pub fn with_requests_per_second(mut self, requests_per_second: Option<u32>) -> Self {
        self.min_interval = requests_per_second
            .filter(|rps| *rps > 0)
            .map(|rps| Duration::from_secs_f64(1.0 / rps as f64));
        self
    }

    async fn pace(&self) {
        let Some(min_interval) = self.min_interval else {
            return;
        };
        let wait = {
            let last = self.last_request.lock().unwrap();
            last.map(|at| min_interval.saturating_sub(at.elapsed()))
        };
        if let Some(wait) = wait {
            if !wait.is_zero() {
                sleep(wait).await;
            }
        }
        *self.last_request.lock().unwrap() = Some(Instant::now());
    }
}

#[async_trait]
impl Geocoder for HttpGeocodeClient {
    async fn geocode(&self, address: &str) -> Result<Coordinates> {
        self.pace().await;

        let res = self
            .client
            .get(&self.base_url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?;

        if res.status() == StatusCode::TOO_MANY_REQUESTS {
            let body = res.text().await.unwrap_or_default();
            return Err(GeocodeError::RateLimit(body));
        }
        let res = res.error_for_status()?;

        let body = res.text().await?;
        let response: GeocodeResponse = serde_json::from_str(&body)
            .map_err(|e| GeocodeError::Parse(format!("invalid geocode response: {}", e)))?;

        match response.status.as_str() {
            "OK" => {
                let hit = response.results.into_iter().next().ok_or_else(|| {
                    GeocodeError::NotFound(format!("no results for address: {}", address))
                })?;
                debug!(
                    address = %address,
                    lat = hit.geometry.location.lat,
                    lng = hit.geometry.location.lng,
                    "Geocoded address"
                );
                Ok(hit.geometry.location)
            }
            "ZERO_RESULTS" => Err(GeocodeError::NotFound(address.to_string())),
            "OVER_QUERY_LIMIT" => Err(GeocodeError::RateLimit(
                response
                    .error_message
                    .unwrap_or_else(|| "query limit exceeded".to_string()),
            )),
            other => Err(GeocodeError::Parse(format!(
                "unexpected geocode status {}: {}",
                other,
                response.error_message.unwrap_or_default()
            ))),
        }
    }
}

/// Configuration for the geocoding data source.
///
/// Use this to explicitly choose between mock and live geocoding clients.
#[derive(Debug, Clone)]
pub enum GeocodeSource {
    /// Use a mock geocoder with pre-configured address → coordinates lookups.
    Mock(HashMap<String, Coordinates>),

    /// Connect to a live geocoding endpoint.
    Live {
        base_url: String,
        api_key: String,
        requests_per_second: Option<u32>,
    },
}

impl GeocodeSource {
    /// Create a mock geocode source with the given lookups.
    pub fn mock(lookups: HashMap<String, Coordinates>) -> Self {
        Self::Mock(lookups)
    }

    /// Create a live geocode source with the given endpoint and key.
    pub fn live(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::Live {
            base_url: base_url.into(),
            api_key: api_key.into(),
            requests_per_second: None,
        }
    }

    /// Cap the live source at the given request rate.
    pub fn with_requests_per_second(mut self, rps: Option<u32>) -> Self {
        if let Self::Live {
            ref mut requests_per_second,
            ..
        } = self
        {
            *requests_per_second = rps;
        }
        self
    }

    /// Create the appropriate Geocoder implementation.
    pub fn into_geocoder(self) -> Box<dyn Geocoder> {
        match self {
            Self::Mock(lookups) => Box::new(MockGeocoder::with_lookups(lookups)),
            Self::Live {
                base_url,
                api_key,
                requests_per_second,
            } => Box::new(
                HttpGeocodeClient::new(&base_url, &api_key)
                    .with_requests_per_second(requests_per_second),
            ),
        }
    }
}
