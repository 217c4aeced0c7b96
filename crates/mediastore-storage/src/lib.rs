//! MediaStore Storage Library
//!
//! This crate provides the storage abstraction, the local filesystem backend and
//! the storage placer that turns an upload into a `StoredAsset`.
//!
//! # Storage key format
//!
//! Keys are user- and collection-scoped, identical for every backend:
//!
//! - `uid_{user_id}/{avatars|gallery|videos}/{uuid}_{unix_ts}.{ext}`
//!
//! A user id that already carries the `uid_` prefix is used verbatim. Keys must
//! not contain `..`, a leading `/`, or backslashes. Key generation is centralized
//! in the `keys` module.

pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod placer;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use placer::StoragePlacer;
pub use traits::{Storage, StorageError, StorageResult, StoredObject};
