use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Media kind; selects the allow-list applied by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target collection of an upload. Each collection belongs to exactly one
/// media kind and owns one directory under the user's storage root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    Avatar,
    Gallery,
    VideoLibrary,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Avatar,
        Collection::Gallery,
        Collection::VideoLibrary,
    ];

    pub fn kind(&self) -> MediaKind {
        match self {
            Collection::Avatar | Collection::Gallery => MediaKind::Image,
            Collection::VideoLibrary => MediaKind::Video,
        }
    }

    /// Directory name under `uid_<id>/`.
    pub fn directory(&self) -> &'static str {
        match self {
            Collection::Avatar => "avatars",
            Collection::Gallery => "gallery",
            Collection::VideoLibrary => "videos",
        }
    }

    /// Multipart field name carrying the file.
    pub fn form_field(&self) -> &'static str {
        match self.kind() {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            Collection::Avatar => "Avatar uploaded successfully",
            Collection::Gallery => "Image uploaded to gallery successfully",
            Collection::VideoLibrary => "Video uploaded successfully",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Avatar => "avatar",
            Collection::Gallery => "gallery",
            Collection::VideoLibrary => "video-library",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file that has been completely written to storage.
///
/// Only the storage placer constructs these, and only after the final rename
/// succeeded, so holding one means the bytes are durable at `path`.
#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub filename: String,
    pub storage_key: String,
    pub path: PathBuf,
    pub url: String,
    pub size: u64,
    pub user_id: String,
    pub kind: MediaKind,
    pub collection: Collection,
    pub created_at: DateTime<Utc>,
}
