//! HTTP error response conversion
//!
//! This module provides HTTP-specific error response conversion for AppError.
//!
//! **Preferred handler pattern:** Return `Result<impl IntoResponse, HttpAppError>`. Use
//! `AppError` (or the domain errors converted below) with `?` so every failure
//! renders through the same status, body and logging path.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mediastore_core::{is_production_environment, AppError, ErrorMetadata, LogLevel};
use mediastore_processing::ValidationError;
use mediastore_storage::StorageError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    /// Suggested action for the client (e.g., "Reduce file size and try again")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from mediastore-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Same rule as `Config::is_production`; the response path has no access to state.
fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| is_production_environment(&env))
        .unwrap_or(false)
}

impl HttpAppError {
    fn to_body(&self, is_production: bool) -> ErrorResponse {
        let app_error = &self.0;
        // Details are never shown in production, nor for sensitive errors anywhere.
        let expose = !is_production && !app_error.is_sensitive();
        ErrorResponse {
            error: app_error.client_message(),
            details: expose.then(|| app_error.detailed_message()),
            error_type: expose.then(|| app_error.error_type().to_string()),
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(&self.0);

        let body = self.to_body(is_production_env());
        (status, Json(body)).into_response()
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::DirectoryCreateFailed(detail) => AppError::Storage {
                client: "Failed to create upload directory",
                detail,
            },
            StorageError::UploadFailed(detail) => AppError::Storage {
                client: "Failed to save file",
                detail,
            },
            StorageError::IoError(err) => AppError::Storage {
                client: "Failed to save file",
                detail: format!("IO error: {}", err),
            },
            StorageError::DownloadFailed(detail) => AppError::Storage {
                client: "Failed to read file",
                detail,
            },
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        // The validator's Display text is the client message.
        let message = err.to_string();
        let app = match err {
            ValidationError::UnsupportedExtension { .. } => AppError::UnsupportedFileType(message),
            ValidationError::FileTooLarge { .. } => AppError::FileTooLarge(message),
        };
        HttpAppError(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediastore_core::models::MediaKind;

    #[test]
    fn test_from_storage_error_directory() {
        let storage_err = StorageError::DirectoryCreateFailed("/srv/uploads: denied".to_string());
        let HttpAppError(app_err) = storage_err.into();
        assert_eq!(app_err.http_status_code(), 500);
        assert_eq!(app_err.client_message(), "Failed to create upload directory");
        assert!(app_err.to_string().contains("/srv/uploads"));
    }

    #[test]
    fn test_from_storage_error_upload_failed() {
        let storage_err = StorageError::UploadFailed("disk full".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::Storage { client, detail } => {
                assert_eq!(client, "Failed to save file");
                assert_eq!(detail, "disk full");
            }
            _ => panic!("Expected Storage variant"),
        }
    }

    #[test]
    fn test_from_storage_error_invalid_key() {
        let storage_err = StorageError::InvalidKey("Invalid key".to_string());
        let HttpAppError(app_err) = storage_err.into();
        match app_err {
            AppError::InvalidInput(msg) => assert_eq!(msg, "Invalid key"),
            _ => panic!("Expected InvalidInput variant"),
        }
    }

    #[test]
    fn test_from_validation_error_keeps_client_message() {
        let validation_err = ValidationError::FileTooLarge {
            size: 6 * 1024 * 1024,
            max: 5 * 1024 * 1024,
        };
        let HttpAppError(app_err) = validation_err.into();
        assert_eq!(app_err.http_status_code(), 400);
        assert_eq!(app_err.client_message(), "File size exceeds 5MB limit");

        let validation_err = ValidationError::UnsupportedExtension {
            extension: "bmp".to_string(),
            kind: MediaKind::Image,
            allowed: vec!["png".to_string(), "gif".to_string()],
        };
        let HttpAppError(app_err) = validation_err.into();
        assert_eq!(app_err.error_code(), "UNSUPPORTED_FILE_TYPE");
        assert_eq!(
            app_err.client_message(),
            "Invalid file type. Only PNG and GIF are allowed"
        );
    }

    #[test]
    fn test_sensitive_errors_hide_details() {
        let err = HttpAppError::from(StorageError::UploadFailed("/srv/secret".to_string()));
        let body = err.to_body(false);
        assert_eq!(body.error, "Failed to save file");
        assert!(body.details.is_none());
        assert!(body.error_type.is_none());
        assert_eq!(body.code, "STORAGE_ERROR");
    }

    #[test]
    fn test_production_hides_details_for_all_errors() {
        let err = HttpAppError(AppError::InvalidInput("bad".to_string()));
        assert!(err.to_body(false).details.is_some());
        assert!(err.to_body(true).details.is_none());
    }

    /// Verifies the public error response contract: serialized ErrorResponse has "error",
    /// "code", "recoverable", and optionally "details" / "error_type" / "suggested_action".
    #[test]
    fn test_error_response_shape() {
        let body = HttpAppError(AppError::Unauthorized(
            "Authorization header is required".to_string(),
        ))
        .to_body(true);
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["error"], "Authorization header is required");
        assert_eq!(json["code"], "UNAUTHORIZED");
        assert_eq!(json["recoverable"], false);
        assert!(json.get("details").is_none());
    }
}
