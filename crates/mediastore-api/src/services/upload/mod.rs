//! Upload pipeline: validate, place, extract, assemble.

mod service;

pub use service::MediaUploadService;
