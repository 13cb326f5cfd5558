//! Geographic point type shared between records and index documents.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair as stored in the search index.
///
/// The field names match the `geo_point` mapping (`lat`/`lon`), which differs
/// from the geocoding API's `lat`/`lng` wire shape. The enricher converts
/// between the two.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_lat_lon() {
        let point = GeoPoint::new(37.422, -122.084);
        let json = serde_json::to_value(&point).unwrap();

        assert_eq!(json["lat"], 37.422);
        assert_eq!(json["lon"], -122.084);
    }
}
