//! Bearer token authentication middleware.
//!
//! Compares `Authorization: Bearer <token>` against the configured shared
//! secret in constant time. Anything else is answered with 403 before the
//! request body is read.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use super::error::ApiError;
use super::AppState;

/// Reject requests that do not carry the configured bearer token.
pub async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    match provided {
        Some(token) if token_matches(token, &state.auth_token) => next.run(req).await,
        _ => {
            tracing::warn!(path = %req.uri().path(), "Rejected request with invalid bearer token");
            ApiError::Unauthorized.into_response()
        }
    }
}

/// An empty configured token never matches.
fn token_matches(provided: &str, expected: &str) -> bool {
    !expected.is_empty() && bool::from(provided.as_bytes().ct_eq(expected.as_bytes()))
}
