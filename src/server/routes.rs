//! Router configuration for the web server.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::auth::require_auth;
use super::handlers;
use super::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    // Auth runs before the multipart body is touched.
    let protected = Router::new()
        .route("/upload_arquivo", post(handlers::upload_arquivo))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
