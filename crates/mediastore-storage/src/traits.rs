//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use std::path::PathBuf;
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create directory: {0}")]
    DirectoryCreateFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// An object that is fully written under its final key.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Storage abstraction trait
///
/// Writes are all-or-nothing: after `upload_stream` returns `Ok`, the complete
/// object is visible under `key`; after it returns `Err`, nothing is.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Consume `reader` until EOF and store the bytes under `storage_key`.
    async fn upload_stream(
        &self,
        storage_key: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<StoredObject>;

    /// Download a file by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Check if a file exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Publicly reachable URL for a key.
    fn public_url(&self, storage_key: &str) -> String;
}
