//! OpenAPI document for the HTTP API.

use axum::{routing::get, Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{
    FileDataResponse, FileListResponse, FileUploadForm, FileUploadResponse, LoginRequest,
    LoginResponse, MessageResponse, RegisterRequest,
};
use super::handlers;
use crate::file::FileRecord;

/// OpenAPI document.
#[derive(OpenApi)]
#[openapi(
    info(title = "filehub", description = "Per-user file storage API"),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::file::upload_file,
        handlers::file::list_files,
        handlers::file::get_file,
        handlers::file::download_file,
        handlers::file::delete_file,
        handlers::health::ping,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        MessageResponse,
        FileRecord,
        FileUploadForm,
        FileUploadResponse,
        FileDataResponse,
        FileListResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "files", description = "Owner-scoped file storage"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

/// Registers the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create a router serving the OpenAPI document at `/api-docs/openapi.json`.
pub fn create_openapi_router() -> Router {
    Router::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let paths = doc["paths"].as_object().unwrap();

        for path in [
            "/api/v1/auth/register",
            "/api/v1/auth/login",
            "/api/v1/files/upload",
            "/api/v1/files",
            "/api/v1/files/{id}",
            "/api/v1/files/{id}/download",
            "/ping",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_openapi_has_bearer_scheme() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert!(doc["components"]["securitySchemes"]["bearer_auth"].is_object());
    }
}
