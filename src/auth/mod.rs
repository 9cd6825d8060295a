//! PSK-based authentication and per-request user identity.
//!
//! The session middleware proper lives outside this service; what reaches
//! us is a pre-shared key plus the authenticated user's id in a header.
//! The PSK comparison is constant-time to mitigate timing attacks.

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;

use crate::errors::{codes, AppError, ErrorBody};

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the authenticated user's id, set by the session layer.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity of the authenticated caller, available to handlers as an extractor.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Missing user identity".to_string()))
    }
}

/// Authentication layer: verifies the PSK (when configured) and extracts
/// the caller's identity into request extensions.
pub async fn auth_layer(expected_psk: Option<String>, mut request: Request, next: Next) -> Response {
    // PSK check first. If no PSK is configured, allow all requests (dev mode).
    if let Some(expected) = expected_psk {
        let provided = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .or_else(|| {
                // Also accept the key as a bearer token
                request
                    .headers()
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.strip_prefix("Bearer "))
                    .map(|s| s.to_string())
            });

        match provided {
            Some(key) if constant_time_compare(&key, &expected) => {}
            Some(_) => return unauthorized_response("Invalid API key"),
            None => return unauthorized_response("Missing or invalid API key"),
        }
    }

    // Every API route requires a caller identity.
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match user_id {
        Some(id) => {
            request.extensions_mut().insert(AuthUser(id));
            next.run(request).await
        }
        None => unauthorized_response("Missing user identity"),
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        code: codes::UNAUTHORIZED.to_string(),
        message: message.to_string(),
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-key"));
    }

    #[test]
    fn test_constant_time_compare_empty() {
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("", "not-empty"));
    }
}
