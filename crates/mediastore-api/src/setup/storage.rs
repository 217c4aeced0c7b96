//! Storage setup and initialization

use anyhow::Result;
use mediastore_core::Config;
use mediastore_storage::Storage;
use std::sync::Arc;

use crate::constants::UPLOADS_PATH;

/// Public URL prefix under which stored files are served.
pub fn public_base_url(config: &Config) -> String {
    format!("{}{}", config.base_url(), UPLOADS_PATH)
}

/// Create the upload root and the storage backend on top of it.
#[cfg(feature = "storage-local")]
pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    use mediastore_storage::LocalStorage;

    tracing::info!(upload_dir = %config.upload_dir, "Initializing local storage...");
    let storage = LocalStorage::new(&config.upload_dir, public_base_url(config))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize local storage: {}", e))?;
    tracing::info!(
        upload_dir = %config.upload_dir,
        public_url = %public_base_url(config),
        "Local storage initialized successfully"
    );

    Ok(Arc::new(storage))
}

#[cfg(not(feature = "storage-local"))]
pub async fn setup_storage(_config: &Config) -> Result<Arc<dyn Storage>> {
    Err(anyhow::anyhow!(
        "No storage backend compiled in. Enable the 'storage-local' feature"
    ))
}
