//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Setup all application routes
///
/// The static asset tree is served as the fallback, so `/upload` and
/// `/health` take precedence over files of the same name.
pub fn setup_routes(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_request_body_bytes();
    let static_assets = ServeDir::new(&state.config.public_dir);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/upload", post(handlers::upload::upload_files))
        .route("/health", get(handlers::health::health))
        .fallback_service(static_assets)
        // Axum's default multipart cap is far below a full batch.
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
