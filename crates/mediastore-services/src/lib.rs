//! MediaStore Services Layer
//!
//! Hosts the outbound integrations (reverse geocoding) and re-exports the
//! validation, processing and storage APIs so the HTTP crate depends on a
//! single service facade. Keep thin HTTP handling in mediastore-api.

pub mod services;

#[cfg(feature = "image")]
pub use mediastore_processing::MetadataExtractor;
pub use mediastore_processing::{MediaValidator, UploadPolicy, ValidationError};
#[cfg(feature = "storage-local")]
pub use mediastore_storage::LocalStorage;
pub use mediastore_storage::{Storage, StorageError, StoragePlacer, StorageResult};
#[cfg(feature = "geocoding")]
pub use services::nominatim::NominatimGeocoder;
