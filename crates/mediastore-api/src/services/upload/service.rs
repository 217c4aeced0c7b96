use std::io::Cursor;
use std::pin::Pin;
use std::time::Instant;

use mediastore_core::models::{Collection, ImageMetadata, MediaKind, StoredAsset, UploadResponse};
use tokio::io::AsyncRead;

use crate::error::HttpAppError;
use crate::state::UploadState;
use crate::utils::upload::ExtractedFile;

/// Runs one upload end to end.
///
/// Validation happens before any side effect; nothing is written for a
/// rejected file. Metadata extraction and geocoding are soft: their failures
/// only mean the response has no `metadata` block.
pub struct MediaUploadService {
    uploads: UploadState,
}

impl MediaUploadService {
    pub fn new(uploads: &UploadState) -> Self {
        Self {
            uploads: uploads.clone(),
        }
    }

    #[tracing::instrument(
        skip(self, file),
        fields(
            user_id = %user_id,
            collection = %collection,
            original_filename = %file.filename,
            size_bytes = file.size()
        )
    )]
    pub async fn upload(
        &self,
        user_id: &str,
        collection: Collection,
        file: ExtractedFile,
    ) -> Result<UploadResponse, HttpAppError> {
        let start = Instant::now();

        // 1. Validate extension and size
        let extension = self
            .uploads
            .validator
            .validate(collection, &file.filename, file.size())?;

        // 2. Persist under the canonical layout
        let reader: Pin<Box<dyn AsyncRead + Send + Unpin>> = Box::pin(Cursor::new(file.data));
        let asset = self
            .uploads
            .placer
            .place(user_id, collection, &extension, reader)
            .await?;

        // 3. Images only: decode capture metadata from the stored file
        let metadata = self.extract_metadata(&asset).await;

        tracing::info!(
            filename = %asset.filename,
            url = %asset.url,
            has_metadata = metadata.is_some(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Upload completed"
        );

        // 4. Assemble the response
        Ok(UploadResponse::from_asset(&asset, metadata))
    }

    async fn extract_metadata(&self, asset: &StoredAsset) -> Option<ImageMetadata> {
        if asset.kind != MediaKind::Image {
            return None;
        }

        #[cfg(feature = "image")]
        {
            self.uploads.extractor.extract(&asset.path).await
        }

        #[cfg(not(feature = "image"))]
        {
            None
        }
    }
}
