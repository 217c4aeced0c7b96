//! Reverse geocoding against a Nominatim-compatible service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use mediastore_core::models::LocationInfo;
use mediastore_core::{GeocoderConfig, ReverseGeocoder};
use serde::Deserialize;
use std::time::Instant;

/// Reasons a lookup produced nothing. Never leaves this module except in logs.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("geocoder request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("geocoder returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("geocoder response could not be decoded: {0}")]
    Body(String),
}

#[derive(Debug, Default, Deserialize)]
struct NominatimResponse {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    country: Option<String>,
    state: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    county: Option<String>,
    district: Option<String>,
    road: Option<String>,
    postcode: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl NominatimResponse {
    /// City prefers city > town > village; district prefers district > county.
    fn into_location(self) -> LocationInfo {
        let address = self.address.unwrap_or_default();
        LocationInfo {
            country: non_empty(address.country),
            state: non_empty(address.state),
            city: non_empty(address.city)
                .or_else(|| non_empty(address.town))
                .or_else(|| non_empty(address.village)),
            district: non_empty(address.district).or_else(|| non_empty(address.county)),
            road: non_empty(address.road),
            postal_code: non_empty(address.postcode),
            display_name: non_empty(self.display_name),
        }
    }
}

/// HTTP reverse geocoder. One GET per lookup, no retries, bounded by the
/// configured timeout.
#[derive(Clone)]
pub struct NominatimGeocoder {
    http_client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for NominatimGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimGeocoder")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client for reverse geocoding")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn lookup(&self, latitude: f64, longitude: f64) -> Result<LocationInfo, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("format", "json".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("zoom", "18".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status));
        }

        let body: NominatimResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Body(e.to_string()))?;

        Ok(body.into_location())
    }
}

#[async_trait]
impl ReverseGeocoder for NominatimGeocoder {
    async fn reverse(&self, latitude: f64, longitude: f64) -> Option<LocationInfo> {
        let start = Instant::now();
        match self.lookup(latitude, longitude).await {
            Ok(location) if !location.is_empty() => {
                tracing::debug!(
                    latitude,
                    longitude,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Reverse geocoding resolved"
                );
                Some(location)
            }
            Ok(_) => {
                tracing::debug!(latitude, longitude, "Reverse geocoding found no address");
                None
            }
            Err(e) => {
                tracing::warn!(
                    latitude,
                    longitude,
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Reverse geocoding failed"
                );
                None
            }
        }
    }
}
