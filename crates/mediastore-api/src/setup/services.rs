//! Service initialization and application state setup

use anyhow::Result;
use mediastore_core::{Config, NoopGeocoder, ReverseGeocoder};
use mediastore_services::{MediaValidator, Storage, StoragePlacer, UploadPolicy};
use std::sync::Arc;

use crate::auth::middleware::AuthState;
use crate::auth::JwtService;
use crate::state::{AppState, UploadState};

/// Build the reverse geocoder from configuration.
pub fn setup_geocoder(config: &Config) -> Result<Arc<dyn ReverseGeocoder>> {
    if !config.geocoder.enabled {
        tracing::info!("Reverse geocoding disabled");
        return Ok(Arc::new(NoopGeocoder));
    }

    #[cfg(feature = "geocoding")]
    {
        use anyhow::Context;

        let geocoder = mediastore_services::NominatimGeocoder::new(&config.geocoder)
            .context("Failed to initialize reverse geocoder")?;
        tracing::info!(
            base_url = %config.geocoder.base_url,
            timeout_secs = config.geocoder.timeout.as_secs(),
            "Reverse geocoding enabled"
        );
        Ok(Arc::new(geocoder))
    }

    #[cfg(not(feature = "geocoding"))]
    {
        tracing::warn!("GEOCODING_ENABLED is set but the 'geocoding' feature is not compiled in");
        Ok(Arc::new(NoopGeocoder))
    }
}

/// Initialize all services, returning the application state
pub fn initialize_services(config: &Config, storage: Arc<dyn Storage>) -> Result<Arc<AppState>> {
    let geocoder = setup_geocoder(config)?;
    Ok(build_state(config, storage, geocoder))
}

/// Assemble the application state from already-built collaborators.
pub fn build_state(
    config: &Config,
    storage: Arc<dyn Storage>,
    geocoder: Arc<dyn ReverseGeocoder>,
) -> Arc<AppState> {
    let policy = UploadPolicy::from_limits(&config.media);
    tracing::debug!(
        avatar_max_bytes = config.media.avatar_max_bytes,
        gallery_max_bytes = config.media.gallery_max_bytes,
        video_max_bytes = config.media.video_max_bytes,
        "Upload policy loaded"
    );

    #[cfg(not(feature = "image"))]
    let _ = geocoder;

    let uploads = UploadState {
        validator: MediaValidator::new(policy),
        placer: StoragePlacer::new(storage),
        #[cfg(feature = "image")]
        extractor: mediastore_services::MetadataExtractor::new(geocoder),
    };

    let auth = Arc::new(AuthState {
        jwt: JwtService::new(config.jwt_secret(), config.base.jwt_expiry_hours),
    });

    Arc::new(AppState {
        uploads,
        auth,
        config: config.clone(),
    })
}
