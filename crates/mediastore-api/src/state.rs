//! Application state and sub-state extractors.
//!
//! AppState is split into sub-states so handlers and middleware can extract
//! only what they need via Axum's `FromRef`. Everything in here is read-only
//! after startup.

use crate::auth::middleware::AuthState;
use mediastore_core::Config;
#[cfg(feature = "image")]
use mediastore_services::MetadataExtractor;
use mediastore_services::{MediaValidator, StoragePlacer};
use std::sync::Arc;

// ----- Sub-state types -----

/// Collaborators of the upload pipeline.
#[derive(Clone)]
pub struct UploadState {
    pub validator: MediaValidator,
    pub placer: StoragePlacer,
    #[cfg(feature = "image")]
    pub extractor: MetadataExtractor,
}

// ----- AppState -----

/// Main application state: aggregates sub-states for dependency injection.
#[derive(Clone)]
pub struct AppState {
    pub uploads: UploadState,
    pub auth: Arc<AuthState>,
    pub config: Config,
}

// ----- FromRef for sub-state extraction -----

impl axum::extract::FromRef<Arc<AppState>> for UploadState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.uploads.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
