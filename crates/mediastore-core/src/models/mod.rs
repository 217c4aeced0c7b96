//! Data models for the application
//!
//! Grouped by concern: stored media, extracted image metadata, and the
//! upload response returned to callers.

mod media;
mod metadata;
mod upload;

// Re-export all models for convenient imports
pub use media::*;
pub use metadata::*;
pub use upload::*;
