//! Route configuration and setup

use crate::constants::{API_PREFIX, UPLOADS_PATH};
use crate::error::HttpAppError;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::{DefaultBodyLimit, Request},
    http::{HeaderValue, Method},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use mediastore_core::{AppError, Config};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    // Public routes (no authentication required)
    let public_routes = public_routes();

    // Protected routes (require authentication)
    let protected_routes = protected_routes().layer(axum::middleware::from_fn_with_state(
        state.auth.clone(),
        crate::auth::middleware::auth_middleware,
    ));

    let app = public_routes
        .merge(protected_routes)
        .merge(uploads_routes(config))
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        // The upload extractor enforces each collection's ceiling while the
        // file part streams in; skipped parts are drained, never buffered.
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Stored files, minus the hidden `.part` temporaries of in-flight uploads.
fn uploads_routes(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .nest_service(UPLOADS_PATH, ServeDir::new(&config.upload_dir))
        .layer(axum::middleware::from_fn(hide_dotfiles))
}

fn is_hidden_path(path: &str) -> bool {
    path.split('/').any(|segment| {
        segment.starts_with('.') || segment.to_ascii_lowercase().starts_with("%2e")
    })
}

async fn hide_dotfiles(request: Request, next: Next) -> Response {
    if is_hidden_path(request.uri().path()) {
        return HttpAppError(AppError::NotFound("File not found".to_string())).into_response();
    }
    next.run(request).await
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/upload/avatar", API_PREFIX),
            post(handlers::image_upload::upload_avatar),
        )
        .route(
            &format!("{}/upload/gallery", API_PREFIX),
            post(handlers::image_upload::upload_gallery),
        )
        .route(
            &format!("{}/upload/video", API_PREFIX),
            post(handlers::video_upload::upload_video),
        )
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|_| anyhow::anyhow!("Invalid CORS origin: {}", o))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_paths() {
        assert!(is_hidden_path("/uploads/uid_1/gallery/.a.png.part"));
        assert!(is_hidden_path("/uploads/uid_1/gallery/%2Ea.png.part"));
        assert!(is_hidden_path("/uploads/.hidden/a.png"));
        assert!(!is_hidden_path("/uploads/uid_1/gallery/1700000000000000000_a1b2.png"));
    }
}
