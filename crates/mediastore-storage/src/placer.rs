//! Storage placer
//!
//! Derives the canonical key for an upload, streams the bytes through the
//! configured backend and returns the resulting `StoredAsset`.

use std::pin::Pin;
use std::sync::Arc;

use chrono::Utc;
use mediastore_core::models::{Collection, StoredAsset};
use tokio::io::AsyncRead;

use crate::keys::{generate_filename, generate_storage_key};
use crate::traits::{Storage, StorageResult};

#[derive(Clone)]
pub struct StoragePlacer {
    storage: Arc<dyn Storage>,
}

impl StoragePlacer {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// Persist `reader` as a new asset in `collection` for `user_id`.
    ///
    /// `extension` is the already-validated, lower-cased extension without the dot.
    /// No `StoredAsset` exists unless the backend reported a complete write.
    pub async fn place(
        &self,
        user_id: &str,
        collection: Collection,
        extension: &str,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<StoredAsset> {
        let filename = generate_filename(extension);
        let key = generate_storage_key(user_id, collection, &filename)?;

        let object = self.storage.upload_stream(&key, reader).await?;
        let url = self.storage.public_url(&object.key);

        tracing::debug!(
            user_id = %user_id,
            collection = %collection,
            key = %object.key,
            size_bytes = object.size,
            "Asset placed"
        );

        Ok(StoredAsset {
            filename,
            storage_key: object.key,
            path: object.path,
            url,
            size: object.size,
            user_id: user_id.to_string(),
            kind: collection.kind(),
            collection,
            created_at: Utc::now(),
        })
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use crate::local::LocalStorage;
    use crate::traits::StorageError;
    use mediastore_core::models::MediaKind;
    use tempfile::tempdir;

    async fn placer(dir: &std::path::Path) -> StoragePlacer {
        let storage = LocalStorage::new(dir, "http://localhost:8080/uploads".to_string())
            .await
            .unwrap();
        StoragePlacer::new(Arc::new(storage))
    }

    fn reader(data: &'static [u8]) -> Pin<Box<dyn AsyncRead + Send + Unpin>> {
        Box::pin(data)
    }

    #[tokio::test]
    async fn test_place_avatar() {
        let dir = tempdir().unwrap();
        let placer = placer(dir.path()).await;

        let asset = placer
            .place("42", Collection::Avatar, "jpg", reader(b"jpeg bytes"))
            .await
            .unwrap();

        assert!(asset.filename.ends_with(".jpg"));
        assert_eq!(asset.storage_key, format!("uid_42/avatars/{}", asset.filename));
        assert_eq!(
            asset.url,
            format!("http://localhost:8080/uploads/uid_42/avatars/{}", asset.filename)
        );
        assert_eq!(asset.size, 10);
        assert_eq!(asset.kind, MediaKind::Image);
        assert_eq!(asset.user_id, "42");
        assert_eq!(tokio::fs::read(&asset.path).await.unwrap(), b"jpeg bytes");
    }

    #[tokio::test]
    async fn test_concurrent_placements_never_collide() {
        let dir = tempdir().unwrap();
        let placer = placer(dir.path()).await;

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let placer = placer.clone();
                tokio::spawn(async move {
                    placer
                        .place("uid_same", Collection::Gallery, "png", reader(b"png"))
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut names = std::collections::HashSet::new();
        for handle in handles {
            names.insert(handle.await.unwrap().filename);
        }
        assert_eq!(names.len(), 16);
    }

    #[tokio::test]
    async fn test_invalid_user_id_is_rejected_before_writing() {
        let dir = tempdir().unwrap();
        let placer = placer(dir.path()).await;

        let result = placer
            .place("../../root", Collection::Avatar, "jpg", reader(b"x"))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
