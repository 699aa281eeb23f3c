//! Request DTOs for the HTTP API.

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// User registration request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Email address.
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "a@x.com")]
    pub email: String,
    /// Password.
    #[validate(length(
        min = 6,
        max = 128,
        message = "Password must be between 6 and 128 characters"
    ))]
    #[schema(example = "secret1")]
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Email address.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Multipart upload form, for the API document only.
#[derive(ToSchema)]
pub struct FileUploadForm {
    /// The file to store.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}
