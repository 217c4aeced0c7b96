//! Reverse-geocoding seam
//!
//! The metadata extractor depends on this trait rather than on a concrete HTTP
//! client, so tests can substitute a fake and production can swap providers.

use async_trait::async_trait;

use crate::models::LocationInfo;

/// Resolves a GPS fix to a place description.
///
/// Implementations never fail: transport errors, timeouts and unusable
/// responses all collapse to `None`.
#[async_trait]
pub trait ReverseGeocoder: Send + Sync {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Option<LocationInfo>;
}

/// Geocoder used when lookups are disabled.
pub struct NoopGeocoder;

#[async_trait]
impl ReverseGeocoder for NoopGeocoder {
    async fn reverse(&self, _latitude: f64, _longitude: f64) -> Option<LocationInfo> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_geocoder_returns_none() {
        let geocoder: Box<dyn ReverseGeocoder> = Box::new(NoopGeocoder);
        assert!(geocoder.reverse(21.0285, 105.8542).await.is_none());
    }
}
