use mediastore_core::config::MediaLimitsConfig;
use mediastore_core::models::{Collection, MediaKind};

const MIB: u64 = 1024 * 1024;

/// Validation errors for uploads. The `Display` text is shown to callers verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid file type. Only {} are allowed", human_list(.allowed))]
    UnsupportedExtension {
        extension: String,
        kind: MediaKind,
        allowed: Vec<String>,
    },

    #[error("File size exceeds {} limit", format_limit(.max))]
    FileTooLarge { size: u64, max: u64 },
}

/// "PNG, JPG, JPEG, and GIF"
fn human_list(items: &[String]) -> String {
    let upper: Vec<String> = items.iter().map(|s| s.to_uppercase()).collect();
    match upper.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [a, b] => format!("{} and {}", a, b),
        [rest @ .., last] => format!("{}, and {}", rest.join(", "), last),
    }
}

fn format_limit(max: &u64) -> String {
    let max = *max;
    if max >= MIB && max % MIB == 0 {
        format!("{}MB", max / MIB)
    } else if max >= MIB {
        format!("{:.1}MB", max as f64 / MIB as f64)
    } else {
        format!("{}KB", max.div_ceil(1024))
    }
}

/// Immutable allow-lists and size ceilings consulted by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    image_extensions: Vec<String>,
    video_extensions: Vec<String>,
    avatar_max_bytes: u64,
    gallery_max_bytes: u64,
    video_max_bytes: u64,
}

impl UploadPolicy {
    pub fn from_limits(limits: &MediaLimitsConfig) -> Self {
        let normalize = |list: &[String]| -> Vec<String> {
            list.iter()
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect()
        };
        Self {
            image_extensions: normalize(&limits.image_allowed_extensions),
            video_extensions: normalize(&limits.video_allowed_extensions),
            avatar_max_bytes: limits.avatar_max_bytes,
            gallery_max_bytes: limits.gallery_max_bytes,
            video_max_bytes: limits.video_max_bytes,
        }
    }

    pub fn allowed_extensions(&self, kind: MediaKind) -> &[String] {
        match kind {
            MediaKind::Image => &self.image_extensions,
            MediaKind::Video => &self.video_extensions,
        }
    }

    pub fn max_size(&self, collection: Collection) -> u64 {
        match collection {
            Collection::Avatar => self.avatar_max_bytes,
            Collection::Gallery => self.gallery_max_bytes,
            Collection::VideoLibrary => self.video_max_bytes,
        }
    }
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::from_limits(&MediaLimitsConfig::default())
    }
}

/// Lower-cased extension of the final path segment, without the dot.
pub fn file_extension(filename: &str) -> String {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    name.rsplit_once('.')
        .map(|(_, ext)| ext.trim().to_lowercase())
        .unwrap_or_default()
}

/// Upload gate
///
/// Runs before any side effect. The extension is checked first, so an
/// unsupported type is reported even when the payload is also too large.
#[derive(Debug, Clone, Default)]
pub struct MediaValidator {
    policy: UploadPolicy,
}

impl MediaValidator {
    pub fn new(policy: UploadPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Validate extension and declared size, returning the normalized extension.
    pub fn validate(
        &self,
        collection: Collection,
        filename: &str,
        declared_size: u64,
    ) -> Result<String, ValidationError> {
        let extension = self.validate_extension(collection.kind(), filename)?;
        self.validate_file_size(collection, declared_size)?;
        Ok(extension)
    }

    /// Validate file extension against the kind's allow-list
    pub fn validate_extension(
        &self,
        kind: MediaKind,
        filename: &str,
    ) -> Result<String, ValidationError> {
        let extension = file_extension(filename);
        let allowed = self.policy.allowed_extensions(kind);

        if extension.is_empty() || !allowed.contains(&extension) {
            return Err(ValidationError::UnsupportedExtension {
                extension,
                kind,
                allowed: allowed.to_vec(),
            });
        }

        Ok(extension)
    }

    /// Validate file size against the collection ceiling
    pub fn validate_file_size(
        &self,
        collection: Collection,
        size: u64,
    ) -> Result<(), ValidationError> {
        let max = self.policy.max_size(collection);
        if size > max {
            return Err(ValidationError::FileTooLarge { size, max });
        }
        Ok(())
    }
}
