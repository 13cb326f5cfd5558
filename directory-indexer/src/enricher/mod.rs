//! Enricher stage for the directory sync.
//!
//! Resolves each record's office address to coordinates. Lookups go through a
//! cache scoped to one run, so the geocoding API sees each distinct address
//! string at most once regardless of how many employees share an office.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use directory_indexer_shared::{EmployeeRecord, GeoPoint};
use geocode::{GeocodeError, Geocoder};

/// Per-run cache of address lookups.
///
/// Owned by the enricher and discarded with it at the end of the run; nothing
/// persists across runs. Unresolvable addresses are cached as `None` so they
/// are not re-queried either.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: HashMap<String, Option<GeoPoint>>,
}

impl GeocodeCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached result. `Some(None)` means the address was already
    /// found unresolvable this run.
    pub fn get(&self, address: &str) -> Option<Option<GeoPoint>> {
        self.entries.get(address).copied()
    }

    /// Record the outcome of a lookup.
    pub fn insert(&mut self, address: &str, location: Option<GeoPoint>) {
        self.entries.insert(address.to_string(), location);
    }

    /// Number of distinct addresses seen this run.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no address has been looked up yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Counters tracked by the enricher across one run.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnricherStats {
    /// Lookups sent to the geocoding API.
    pub lookups: u64,
    /// Lookups answered from the per-run cache.
    pub cache_hits: u64,
    /// Addresses the geocoding API could not resolve.
    pub unresolved: u64,
}

/// Enricher that attaches coordinates to employee records.
///
/// Policy per record: an unresolvable address is logged and the record passes
/// through without coordinates; a rate-limit or connectivity error is fatal
/// and propagates to the orchestrator. Records that already carry coordinates
/// from the directory keep them without a lookup.
pub struct Enricher {
    geocoder: Arc<dyn Geocoder>,
    cache: GeocodeCache,
    stats: EnricherStats,
}

impl Enricher {
    /// Create a new enricher over the given geocoder.
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            geocoder,
            cache: GeocodeCache::new(),
            stats: EnricherStats::default(),
        }
    }

    /// Enrich one page of records, in order.
    pub async fn enrich_page(
        &mut self,
        records: Vec<EmployeeRecord>,
    ) -> Result<Vec<EmployeeRecord>, GeocodeError> {
        let mut enriched = Vec::with_capacity(records.len());

        for mut record in records {
            if record.location.is_none() {
                if let Some(address) = record.office_location.clone() {
                    if !address.is_empty() {
                        record.location = self.resolve(&address).await?;
                    }
                }
            }
            enriched.push(record);
        }

        Ok(enriched)
    }

    /// Resolve one address, consulting the cache first.
    async fn resolve(&mut self, address: &str) -> Result<Option<GeoPoint>, GeocodeError> {
        if let Some(cached) = self.cache.get(address) {
            self.stats.cache_hits += 1;
            debug!(address = %address, "Geocode cache hit");
            return Ok(cached);
        }

        self.stats.lookups += 1;
        match self.geocoder.geocode(address).await {
            Ok(coordinates) => {
                let location = GeoPoint::new(coordinates.lat, coordinates.lng);
                self.cache.insert(address, Some(location));
                Ok(Some(location))
            }
            Err(GeocodeError::NotFound(_)) => {
                warn!(address = %address, "Address could not be geocoded");
                self.stats.unresolved += 1;
                self.cache.insert(address, None);
                Ok(None)
            }
            // RateLimit and connectivity errors abort the run
            Err(e) => Err(e),
        }
    }

    /// Counters accumulated so far this run.
    pub fn stats(&self) -> EnricherStats {
        self.stats
    }
}
