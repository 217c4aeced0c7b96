//! MediaStore API Library
//!
//! This crate provides the HTTP handlers, authentication middleware, upload
//! pipeline and application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
mod services;
pub mod setup;
pub mod telemetry;
mod utils;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::upload::MediaUploadService;
