//! Authentication handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::web::dto::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// POST /api/v1/auth/register - Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "Invalid email or password"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.identity.register(&req.email, &req.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// POST /api/v1/auth/login - Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login succeeded", body = LoginResponse),
        (status = 400, description = "Missing fields"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let token = state.identity.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse { token }))
}
