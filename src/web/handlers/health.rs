//! Liveness handlers.

use axum::Json;

use crate::web::dto::MessageResponse;

/// GET /ping - Liveness check.
#[utoipa::path(
    get,
    path = "/ping",
    tag = "health",
    responses((status = 200, description = "Service is up", body = MessageResponse))
)]
pub async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse::new("pong"))
}

/// GET /health - Plain-text health check.
pub async fn health_check() -> &'static str {
    "OK"
}
