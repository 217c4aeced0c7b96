//! Common utilities for file upload handlers

use axum::body::Bytes;
use axum::extract::Multipart;
use mediastore_core::models::Collection;
use mediastore_core::AppError;
use mediastore_services::MediaValidator;

use crate::error::HttpAppError;

/// One file part pulled out of a multipart body, fully buffered.
#[derive(Debug)]
pub struct ExtractedFile {
    pub data: Bytes,
    pub filename: String,
    pub content_type: Option<String>,
}

impl ExtractedFile {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

pub fn missing_field_error(field_name: &str) -> AppError {
    AppError::InvalidInput(format!(
        "No file uploaded or invalid field name. Use '{}' as field name",
        field_name
    ))
}

/// Extract the first file part in `collection`'s form field.
///
/// Other parts are skipped. A part with the right name but no filename is not
/// a file upload and is skipped too. The extension is checked as soon as the
/// part headers arrive and the collection ceiling is enforced while the bytes
/// stream in, so neither a wrong type nor an oversized file is buffered.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
    collection: Collection,
    validator: &MediaValidator,
) -> Result<ExtractedFile, HttpAppError> {
    let field_name = collection.form_field();
    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Err(missing_field_error(field_name).into()),
            Err(e) => {
                tracing::debug!(error = %e, "Failed to read multipart body");
                return Err(missing_field_error(field_name).into());
            }
        };

        if field.name() != Some(field_name) {
            continue;
        }

        let filename = match field.file_name().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let content_type = field.content_type().map(|s: &str| s.to_string());

        validator.validate_extension(collection.kind(), &filename)?;

        let mut data = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(|e| {
            AppError::InvalidInput(format!("Failed to read file data: {}", e))
        })? {
            let received = (data.len() + chunk.len()) as u64;
            if let Err(e) = validator.validate_file_size(collection, received) {
                tracing::debug!(
                    filename = %filename,
                    received_bytes = received,
                    "Upload exceeded collection ceiling while streaming"
                );
                return Err(e.into());
            }
            data.extend_from_slice(&chunk);
        }

        return Ok(ExtractedFile {
            data: Bytes::from(data),
            filename,
            content_type,
        });
    }
}
