//! Shared key generation for storage backends.
//!
//! Key format: `uid_{user_id}/{collection_dir}/{uuid}_{unix_ts}.{ext}`.

use chrono::Utc;
use mediastore_core::models::Collection;
use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

const USER_SCOPE_PREFIX: &str = "uid_";

/// Directory segment that owns all of a user's files.
///
/// Ids minted as `uid_<uuid>` are used as-is; bare ids get the prefix. Only
/// ASCII alphanumerics, `-` and `_` are accepted so the id can never form a
/// path component other than a plain name.
pub fn user_scope(user_id: &str) -> StorageResult<String> {
    let valid = !user_id.is_empty()
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(StorageError::InvalidKey(format!(
            "Invalid user id for storage path: {:?}",
            user_id
        )));
    }

    if user_id.starts_with(USER_SCOPE_PREFIX) && user_id.len() > USER_SCOPE_PREFIX.len() {
        Ok(user_id.to_string())
    } else {
        Ok(format!("{}{}", USER_SCOPE_PREFIX, user_id))
    }
}

/// Directory (relative to the storage root) for a user's collection.
pub fn collection_prefix(user_id: &str, collection: Collection) -> StorageResult<String> {
    Ok(format!("{}/{}", user_scope(user_id)?, collection.directory()))
}

/// Full storage key for a generated filename.
pub fn generate_storage_key(
    user_id: &str,
    collection: Collection,
    filename: &str,
) -> StorageResult<String> {
    if filename.is_empty() || filename.contains(['/', '\\']) || filename.starts_with('.') {
        return Err(StorageError::InvalidKey(format!(
            "Invalid filename for storage key: {:?}",
            filename
        )));
    }
    Ok(format!("{}/{}", collection_prefix(user_id, collection)?, filename))
}

/// Collision-resistant filename: `<uuid v4>_<unix seconds>` plus `.ext`.
///
/// Uniqueness comes from the random UUID; the timestamp only aids ordering.
pub fn generate_filename(extension: &str) -> String {
    let ext = extension.trim_start_matches('.');
    let stem = format!("{}_{}", Uuid::new_v4(), Utc::now().timestamp());
    if ext.is_empty() {
        stem
    } else {
        format!("{}.{}", stem, ext.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_user_scope_prefixes_bare_ids() {
        assert_eq!(user_scope("42").unwrap(), "uid_42");
        assert_eq!(
            user_scope("6553f0c2a1b2c3d4e5f60718").unwrap(),
            "uid_6553f0c2a1b2c3d4e5f60718"
        );
    }

    #[test]
    fn test_user_scope_keeps_existing_prefix() {
        let id = "uid_0f8fad5b-d9cb-469f-a165-70867728950e";
        assert_eq!(user_scope(id).unwrap(), id);
    }

    #[test]
    fn test_user_scope_rejects_path_tricks() {
        for bad in ["", "..", "a/b", "a\\b", "../etc", "x y", "uid_/../"] {
            assert!(
                matches!(user_scope(bad), Err(StorageError::InvalidKey(_))),
                "expected rejection for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_storage_key_layout() {
        assert_eq!(
            generate_storage_key("7", Collection::Avatar, "a_1.jpg").unwrap(),
            "uid_7/avatars/a_1.jpg"
        );
        assert_eq!(
            generate_storage_key("7", Collection::Gallery, "a_1.png").unwrap(),
            "uid_7/gallery/a_1.png"
        );
        assert_eq!(
            generate_storage_key("7", Collection::VideoLibrary, "a_1.mp4").unwrap(),
            "uid_7/videos/a_1.mp4"
        );
        assert!(generate_storage_key("7", Collection::Avatar, "../x.jpg").is_err());
        assert!(generate_storage_key("7", Collection::Avatar, ".hidden").is_err());
    }

    #[test]
    fn test_generated_filename_shape() {
        let name = generate_filename(".JPG");
        assert!(name.ends_with(".jpg"));
        let stem = name.trim_end_matches(".jpg");
        let (uuid_part, ts_part) = stem.rsplit_once('_').unwrap();
        assert!(Uuid::parse_str(uuid_part).is_ok());
        assert!(ts_part.parse::<i64>().unwrap() > 1_600_000_000);
    }

    #[test]
    fn test_generated_filenames_are_unique_within_same_second() {
        let names: HashSet<String> = (0..1000).map(|_| generate_filename("mp4")).collect();
        assert_eq!(names.len(), 1000);
    }
}
