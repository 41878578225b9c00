use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{CurrentUser, TokenError};
use crate::error::ApiError;
use crate::AppState;

/// Routes reachable without a session token
pub const PUBLIC_PATHS: [&str; 7] = [
    "/api/admin/auth/login",
    "/api/admin/auth/refreshtoken",
    "/api/client/auth/login",
    "/api/client/auth/refreshtoken",
    "/api/client/auth/loginsocial",
    "/api/client/auth/loginsocialsuccess",
    "/health",
];

const ADMIN_PREFIX: &str = "/api/admin/";

pub fn is_public_path(path: &str) -> bool {
    let path = path.to_ascii_lowercase();
    let path = match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path.as_str(),
    };
    PUBLIC_PATHS.contains(&path)
}

/// Resolve the bearer token into a [`CurrentUser`] or answer with the
/// Unauthorized envelope. Admin routes also require an admin session.
pub async fn auth_gate(State(state): State<AppState>, headers: HeaderMap, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if is_public_path(&path) {
        return next.run(request).await;
    }

    let token = match extract_bearer(&headers) {
        Ok(token) => token,
        Err(reason) => {
            tracing::debug!(path = %path, reason, "request rejected by auth gate");
            return ApiError::Unauthorized.into_response();
        }
    };

    let claims = match state.tokens.authenticate(token) {
        Ok(claims) => claims,
        Err(err) => {
            log_rejection(&path, &err);
            return ApiError::Unauthorized.into_response();
        }
    };

    let user = CurrentUser::from(claims);
    if path.to_ascii_lowercase().starts_with(ADMIN_PREFIX) && !user.is_admin() {
        tracing::warn!(path = %path, user_id = %user.id(), "client session used on admin route");
        return ApiError::Forbidden.into_response();
    }

    request.extensions_mut().insert(user);
    next.run(request).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, &'static str> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("missing authorization header")?
        .to_str()
        .map_err(|_| "authorization header is not ascii")?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next()) {
        (Some("Bearer"), Some(token)) if !token.is_empty() => Ok(token),
        _ => Err("authorization header is not a bearer token"),
    }
}

fn log_rejection(path: &str, err: &TokenError) {
    let area = if path.starts_with("/api/admin") {
        "admin"
    } else if path.starts_with("/api/client") {
        "client"
    } else {
        "other"
    };
    tracing::warn!(area, path = %path, error = %err, operation = "checkAuthentication", "session rejected");
}
