//! Router configuration for the HTTP API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    delete_file, download_file, get_file, health_check, list_files, login, ping, register,
    upload_file, AppState,
};
use super::middleware::{create_cors_layer, jwt_auth};
use super::openapi::create_openapi_router;
use crate::auth::TokenService;

/// Multipart framing allowance on top of the file size limit.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Create the main API router, mounted under `/api/v1`.
pub fn create_router(
    app_state: Arc<AppState>,
    tokens: Arc<TokenService>,
    cors_origins: &[String],
) -> Router {
    let upload_limit = usize::try_from(app_state.files.max_file_size())
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD);

    let auth_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .route("/files", get(list_files))
        .route(
            "/files/upload",
            post(upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/files/:id", get(get_file).delete(delete_file))
        .route("/files/:id/download", get(download_file));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/ping", get(ping))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let tokens = tokens.clone();
                    jwt_auth(tokens, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create the full application: API, health check and OpenAPI document.
pub fn create_app(
    app_state: Arc<AppState>,
    tokens: Arc<TokenService>,
    cors_origins: &[String],
) -> Router {
    create_router(app_state, tokens, cors_origins)
        .merge(create_health_router())
        .merge(create_openapi_router())
}
