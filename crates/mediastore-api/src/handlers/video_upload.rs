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

/// Upload video
///
/// Stores one video under the caller's `videos` collection. Videos are not
/// inspected, so the response never has a `metadata` block.
#[utoipa::path(
    post,
    path = "/api/v1/upload/video",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Single file in the `video` field"),
    responses(
        (status = 200, description = "Video uploaded successfully", body = UploadResponse),
        (status = 400, description = "Missing file, unsupported type or file too large", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 500, description = "File could not be stored", body = ErrorResponse)
    ),
    security(("bearer_token" = []))
)]
#[tracing::instrument(
    skip(state, user, multipart),
    fields(user_id = %user.user_id, operation = "upload_video")
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let collection = Collection::VideoLibrary;
    let field_name = collection.form_field();
    let multipart = multipart.map_err(|e| {
        tracing::debug!(error = %e, "Rejected non-multipart upload body");
        missing_field_error(field_name)
    })?;
    let file = extract_multipart_file(multipart, collection, &state.uploads.validator).await?;

    tracing::debug!(
        filename = %file.filename,
        content_type = ?file.content_type,
        size_bytes = file.size(),
        "Video received"
    );

    let response = MediaUploadService::new(&state.uploads)
        .upload(&user.user_id, collection, file)
        .await?;
    Ok(Json(response))
}
