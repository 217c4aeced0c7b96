//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use mediastore_core::models;

/// Registers the bearer scheme referenced by the upload endpoints.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_token",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Returns the OpenAPI spec served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MediaStore API",
        version = "0.1.0",
        description = "Media ingestion API (v1). Authenticated users upload avatars, gallery images and videos; stored files are served back under /uploads/. Image uploads return capture metadata read from EXIF, with GPS fixes resolved to a place."
    ),
    paths(
        // Uploads
        handlers::image_upload::upload_avatar,
        handlers::image_upload::upload_gallery,
        handlers::video_upload::upload_video,
        // Config
        handlers::health::health_check,
    ),
    components(
        schemas(
            models::UploadResponse,
            models::ImageMetadata,
            models::LocationInfo,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "uploads", description = "Avatar, gallery and video uploads"),
        (name = "config", description = "Service health checks")
    )
)]
pub struct ApiDoc;
