use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use mediastore_core::models::{Collection, UploadResponse};

use crate::auth::models::UserContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::MediaUploadService;
use crate::state::AppState;
use crate::utils::upload::{extract_multipart_file, missing_field_error};

/// Shared body of the two image endpoints.
async fn upload_image(
    state: &AppState,
    user: &UserContext,
    collection: Collection,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let field_name = collection.form_field();
    // A body that is not multipart at all reads the same as a missing field.
    let multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Rejected non-multipart upload body");
        missing_field_error(field_name)
    })?;
    let file = extract_multipart_file(multipart, collection, &state.uploads.validator).await?;

    let response = MediaUploadService::new(&state.uploads)
        .upload(&user.user_id, collection, file)
        .await?;
    Ok(Json(response))
}

/// Upload avatar
///
/// Stores one image under the caller's `avatars` collection. The response
/// carries capture metadata when the image has an EXIF block.
#[utoipa::path(
    post,
    path = "/api/v1/upload/avatar",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Single file in the `image` field"),
    responses(
        (status = 200, description = "Avatar uploaded successfully", body = UploadResponse),
        (status = 400, description = "Missing file, unsupported type or file too large", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 500, description = "File could not be stored", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(
    skip(state, user, multipart),
    fields(user_id = %user.user_id, operation = "upload_avatar")
)]
pub async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    upload_image(&state, &user, Collection::Avatar, multipart).await
}

/// Upload gallery image
#[utoipa::path(
    post,
    path = "/api/v1/upload/gallery",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Single file in the `image` field"),
    responses(
        (status = 200, description = "Image uploaded to gallery successfully", body = UploadResponse),
        (status = 400, description = "Missing file, unsupported type or file too large", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 500, description = "File could not be stored", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(
    skip(state, user, multipart),
    fields(user_id = %user.user_id, operation = "upload_gallery")
)]
pub async fn upload_gallery(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    upload_image(&state, &user, Collection::Gallery, multipart).await
}
