//! MediaStore Processing Library
//!
//! Upload validation against the configured policy and capture-metadata
//! extraction for stored images.

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;
#[cfg(feature = "image")]
pub mod metadata;
pub mod validator;

#[cfg(feature = "image")]
pub use metadata::MetadataExtractor;
pub use validator::{MediaValidator, UploadPolicy, ValidationError};
