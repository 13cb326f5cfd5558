//! Mock geocoder for testing and local development.
//!
//! The `MockGeocoder` can be pre-populated with address → coordinates lookups,
//! allowing tests to run without network access. It counts calls so tests can
//! assert that cached addresses are not re-queried.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use crate::{Coordinates, GeocodeError, Geocoder, Result};

/// Mock geocoder that returns pre-configured coordinates.
///
/// Addresses without a registered lookup resolve to [`GeocodeError::NotFound`].
/// The mock can also simulate quota exhaustion with
/// [`with_rate_limit`](Self::with_rate_limit).
pub struct MockGeocoder {
    lookups: RwLock<HashMap<String, Coordinates>>,
    rate_limited: bool,
    calls: AtomicUsize,
}

impl MockGeocoder {
    /// Create a new empty mock geocoder.
    pub fn new() -> Self {
        Self {
            lookups: RwLock::new(HashMap::new()),
            rate_limited: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock geocoder pre-populated with the given lookups.
    pub fn with_lookups(lookups: HashMap<String, Coordinates>) -> Self {
        Self {
            lookups: RwLock::new(lookups),
            ..Self::new()
        }
    }

    /// Fail every lookup with a rate-limit error.
    pub fn with_rate_limit(mut self) -> Self {
        self.rate_limited = true;
        self
    }

    /// Register coordinates to be returned for a given address.
    pub fn register(&self, address: &str, coordinates: Coordinates) {
        self.lookups
            .write()
            .unwrap()
            .insert(address.to_string(), coordinates);
    }

    /// Number of geocode calls made against this mock.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockGeocoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Geocoder for MockGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coordinates> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.rate_limited {
            return Err(GeocodeError::RateLimit("mock quota exhausted".to_string()));
        }

        self.lookups
            .read()
            .unwrap()
            .get(address)
            .copied()
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registered_address_resolves() {
        let geocoder = MockGeocoder::new();
        geocoder.register("Rome, Italy", Coordinates::new(41.89, 12.49));

        let coords = geocoder.geocode("Rome, Italy").await.unwrap();
        assert_eq!(coords, Coordinates::new(41.89, 12.49));
        assert_eq!(geocoder.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_address_is_not_found() {
        let geocoder = MockGeocoder::new();

        let result = geocoder.geocode("Atlantis").await;
        assert!(matches!(result, Err(GeocodeError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rate_limited_mock() {
        let geocoder = MockGeocoder::new().with_rate_limit();
        geocoder.register("Rome, Italy", Coordinates::new(41.89, 12.49));

        let result = geocoder.geocode("Rome, Italy").await;
        assert!(matches!(result, Err(GeocodeError::RateLimit(_))));
    }

    #[tokio::test]
    async fn test_call_count_tracks_every_call() {
        let geocoder = MockGeocoder::new();
        geocoder.register("Rome, Italy", Coordinates::new(41.89, 12.49));

        let _ = geocoder.geocode("Rome, Italy").await;
        let _ = geocoder.geocode("Atlantis").await;
        let _ = geocoder.geocode("Rome, Italy").await;

        assert_eq!(geocoder.call_count(), 3);
    }
}
