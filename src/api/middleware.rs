//! HTTP middleware for API layer.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::app::AppState;
use crate::domain::ApiError;

/// Constant-time comparison of two byte slices to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Compare credentials via SHA-256 digests for constant-time comparison.
fn digests_match(expected: &str, provided: &str) -> bool {
    let expected = Sha256::digest(expected.as_bytes());
    let provided = Sha256::digest(provided.as_bytes());
    constant_time_eq(expected.as_slice(), provided.as_slice())
}

fn provided_key(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
}

/// API key authentication middleware.
/// Protects POST endpoints by requiring a valid `x-api-key` header when a
/// service key is configured. GET requests pass through without
/// authentication.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.method() != Method::POST {
        return next.run(request).await;
    }

    let Some(expected) = state.auth.service_key.as_ref() else {
        return next.run(request).await;
    };

    let Some(provided) = provided_key(&request) else {
        warn!("API auth failed: missing x-api-key header");
        return ApiError::unauthorized().into_response();
    };

    if !digests_match(expected.expose_secret(), provided) {
        warn!("API auth failed: invalid x-api-key");
        return ApiError::unauthorized().into_response();
    }

    next.run(request).await
}

/// Admin key middleware for operator endpoints.
///
/// A caller presenting the plain service key is recognized but refused with
/// a privilege error; an unknown or missing key is an authentication error.
pub async fn admin_auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.auth.admin_key.as_ref() else {
        return next.run(request).await;
    };

    let Some(provided) = provided_key(&request) else {
        warn!("API auth failed: missing x-api-key header");
        return ApiError::unauthorized().into_response();
    };

    if digests_match(expected.expose_secret(), provided) {
        return next.run(request).await;
    }

    let holds_service_key = state
        .auth
        .service_key
        .as_ref()
        .is_some_and(|key| digests_match(key.expose_secret(), provided));

    if holds_service_key {
        warn!("API auth failed: service key presented on an operator endpoint");
        return ApiError::forbidden().into_response();
    }

    warn!("API auth failed: invalid x-api-key");
    ApiError::unauthorized().into_response()
}
