//! MediaStore Core Library
//!
//! This crate provides the domain models, error types, configuration and the
//! reverse-geocoding seam shared by every MediaStore component.

pub mod config;
pub mod error;
pub mod geocoding;
pub mod models;

// Re-export commonly used types
pub use config::{
    is_production_environment, resolve_base_url, BaseConfig, Config, GeocoderConfig,
    MediaLimitsConfig,
};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use geocoding::{NoopGeocoder, ReverseGeocoder};
// Note: Storage, StorageError live in mediastore-storage
// Import them directly from mediastore-storage instead of mediastore-core
