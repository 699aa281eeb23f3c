//! Response DTOs for the HTTP API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::file::FileRecord;

/// Response carrying only a message.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Login response.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Bearer token (JWT).
    pub token: String,
}

/// Upload response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileUploadResponse {
    /// Human-readable message.
    pub message: String,
    /// The stored file's metadata.
    pub data: FileRecord,
}

/// Single-file response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileDataResponse {
    /// File metadata.
    pub data: FileRecord,
}

/// File list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileListResponse {
    /// The caller's files, newest first.
    pub data: Vec<FileRecord>,
}
