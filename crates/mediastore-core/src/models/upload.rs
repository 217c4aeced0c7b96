use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::media::StoredAsset;
use super::metadata::ImageMetadata;

/// Success body for every upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub user_id: String,
    pub filename: String,
    pub url: String,
    pub size: u64,
    /// Present only when at least one metadata field was decoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ImageMetadata>,
}

impl UploadResponse {
    /// Assemble the caller-facing result from a stored asset and its optional metadata.
    pub fn from_asset(asset: &StoredAsset, metadata: Option<ImageMetadata>) -> Self {
        Self {
            message: asset.collection.success_message().to_string(),
            user_id: asset.user_id.clone(),
            filename: asset.filename.clone(),
            url: asset.url.clone(),
            size: asset.size,
            metadata: metadata.and_then(ImageMetadata::into_option),
        }
    }
}
