use crate::auth::jwt::JwtService;
use crate::auth::models::UserContext;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use mediastore_core::AppError;
use std::sync::Arc;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct AuthState {
    pub jwt: JwtService,
}

fn unauthorized(message: &str) -> Response {
    HttpAppError(AppError::Unauthorized(message.to_string())).into_response()
}

/// Verify the bearer token and attach the caller's `UserContext` to the request.
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        Some(h) if !h.trim().is_empty() => h,
        _ => {
            tracing::debug!(path = %request.uri().path(), "Missing authorization header");
            return unauthorized("Authorization header is required");
        }
    };

    let token = match auth_header.strip_prefix(BEARER_PREFIX).map(str::trim) {
        Some(token) if !token.is_empty() && !token.contains(' ') => token,
        _ => {
            tracing::debug!("Invalid authorization header format");
            return unauthorized("Invalid authorization header format. Expected: Bearer <token>");
        }
    };

    let claims = match auth_state.jwt.verify(token) {
        Ok(claims) => claims,
        Err(e) => return HttpAppError(e).into_response(),
    };

    tracing::debug!(user_id = %claims.user_id, role = %claims.role, "Request authenticated");
    request.extensions_mut().insert(UserContext::from(claims));
    next.run(request).await
}
