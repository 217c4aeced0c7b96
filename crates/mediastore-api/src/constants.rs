//! API-wide constants.

/// Full API path prefix. Upload routes are served under it.
pub const API_PREFIX: &str = "/api/v1";

/// URL prefix stored files are served under, mirroring the storage layout.
pub const UPLOADS_PATH: &str = "/uploads";
