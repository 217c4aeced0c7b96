use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use std::pin::Pin;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "uploads")
    /// * `base_url` - Base URL the root is served under (e.g., "http://localhost:8080/uploads")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Convert storage key to filesystem path.
    ///
    /// Every component must be a plain name, so the result always stays under
    /// `base_path`.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty() || storage_key.contains('\\') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let relative = Path::new(storage_key);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }

        Ok(self.base_path.join(relative))
    }

    /// Hidden sibling the bytes are streamed into before the final rename.
    fn temp_path_for(path: &Path) -> StorageResult<PathBuf> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StorageError::InvalidKey("Storage key has no file name".to_string()))?;
        Ok(path.with_file_name(format!(".{}.part", name)))
    }

    /// Stream into a temp file, fsync, then rename into place.
    async fn write_atomically(
        &self,
        path: &Path,
        reader: &mut Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let temp_path = Self::temp_path_for(path)?;

        let result = async {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            let bytes_copied = tokio::io::copy(reader, &mut file).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to write stream to file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await?;
            file.sync_all().await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to sync file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
            drop(file);

            fs::rename(&temp_path, path).await.map_err(|e| {
                StorageError::UploadFailed(format!(
                    "Failed to move {} into place: {}",
                    path.display(),
                    e
                ))
            })?;

            Ok::<u64, StorageError>(bytes_copied)
        }
        .await;

        if result.is_err() {
            if let Err(cleanup_err) = fs::remove_file(&temp_path).await {
                if cleanup_err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(
                        path = %temp_path.display(),
                        error = %cleanup_err,
                        "Failed to remove partial upload"
                    );
                }
            }
        }

        result
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload_stream(
        &self,
        storage_key: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<StoredObject> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::DirectoryCreateFailed(format!("{}: {}", parent.display(), e))
            })?;
        }

        let size = self.write_atomically(&path, &mut reader).await?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage stream upload successful"
        );

        Ok(StoredObject {
            key: storage_key.to_string(),
            path,
            size,
        })
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_key)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_key.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::DownloadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url, storage_key)
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use std::io;
    use std::task::{Context, Poll};
    use tempfile::tempdir;
    use tokio::io::ReadBuf;

    fn reader(data: &[u8]) -> Pin<Box<dyn AsyncRead + Send + Unpin>> {
        Box::pin(std::io::Cursor::new(data.to_vec()))
    }

    /// Yields one chunk, then fails like a dropped client connection.
    struct BrokenReader {
        sent: bool,
    }

    impl AsyncRead for BrokenReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            if self.sent {
                return Poll::Ready(Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "client went away",
                )));
            }
            self.sent = true;
            buf.put_slice(b"partial bytes");
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_local_storage_upload_download() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8080/uploads/".to_string())
            .await
            .unwrap();

        let data = b"test data";
        let stored = storage
            .upload_stream("uid_1/gallery/a_1.jpg", reader(data))
            .await
            .unwrap();

        assert_eq!(stored.size, data.len() as u64);
        assert_eq!(stored.path, dir.path().join("uid_1/gallery/a_1.jpg"));
        assert_eq!(
            storage.public_url(&stored.key),
            "http://localhost:8080/uploads/uid_1/gallery/a_1.jpg"
        );
        assert_eq!(storage.download(&stored.key).await.unwrap(), data);
    }

    #[tokio::test]
    async fn test_creates_nested_directories_idempotently() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://x/uploads".to_string())
            .await
            .unwrap();

        storage
            .upload_stream("uid_1/videos/a.mp4", reader(b"one"))
            .await
            .unwrap();
        storage
            .upload_stream("uid_1/videos/b.mp4", reader(b"two"))
            .await
            .unwrap();

        assert!(storage.exists("uid_1/videos/a.mp4").await.unwrap());
        assert!(storage.exists("uid_1/videos/b.mp4").await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_stream_leaves_nothing_visible() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://x/uploads".to_string())
            .await
            .unwrap();

        let result = storage
            .upload_stream(
                "uid_1/avatars/broken.jpg",
                Box::pin(BrokenReader { sent: false }),
            )
            .await;

        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
        assert!(!storage.exists("uid_1/avatars/broken.jpg").await.unwrap());

        let mut entries = fs::read_dir(dir.path().join("uid_1/avatars")).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://x/uploads".to_string())
            .await
            .unwrap();

        let result = storage.download("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage
            .upload_stream("uid_1/./../escape.jpg", reader(b"x"))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_directory_creation_failure_is_reported() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://x/uploads".to_string())
            .await
            .unwrap();

        // A regular file where the user directory should go.
        fs::write(dir.path().join("uid_9"), b"not a dir").await.unwrap();

        let result = storage
            .upload_stream("uid_9/gallery/a.png", reader(b"png"))
            .await;
        assert!(matches!(result, Err(StorageError::DirectoryCreateFailed(_))));
    }

    #[tokio::test]
    async fn test_download_missing_is_not_found() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://x/uploads".to_string())
            .await
            .unwrap();

        let result = storage.download("uid_1/gallery/missing.png").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }
}
