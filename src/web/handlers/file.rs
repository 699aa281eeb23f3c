//! File handlers.

use axum::{
    body::Body,
    extract::{multipart::Field, Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use std::sync::Arc;

use crate::file::UploadRequest;
use crate::web::dto::{FileDataResponse, FileListResponse, FileUploadResponse, MessageResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// Generate a safe Content-Disposition header value for file downloads.
///
/// Control characters are dropped (no header injection), quotes and
/// backslashes are replaced in the plain `filename`, and non-ASCII names are
/// also sent as an RFC 5987 `filename*`.
fn content_disposition_header(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && sanitized == filename {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let encoded = urlencoding::encode(&sanitized);
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// Parse a file ID path segment.
fn parse_file_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::bad_request("Invalid file ID"))
}

/// Read a multipart field, stopping as soon as it exceeds `max_size` bytes.
async fn read_limited(
    field: &mut Field<'_>,
    max_size: u64,
    too_large: &str,
) -> Result<Vec<u8>, ApiError> {
    let mut content = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, too_large))? {
        if (content.len() + chunk.len()) as u64 > max_size {
            return Err(ApiError::bad_request(too_large));
        }
        content.extend_from_slice(&chunk);
    }
    Ok(content)
}

fn multipart_error(e: axum::extract::multipart::MultipartError, too_large: &str) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::bad_request(too_large)
    } else {
        tracing::debug!("Failed to read multipart data: {}", e);
        ApiError::bad_request("Invalid multipart data")
    }
}

/// POST /api/v1/files/upload - Upload a file.
#[utoipa::path(
    post,
    path = "/api/v1/files/upload",
    tag = "files",
    request_body(
        content = crate::web::dto::FileUploadForm,
        content_type = "multipart/form-data",
        description = "Multipart form with a single `file` field"
    ),
    responses(
        (status = 200, description = "File uploaded", body = FileUploadResponse),
        (status = 400, description = "Missing, empty or oversized file"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<Json<FileUploadResponse>, ApiError> {
    let max_size = state.files.max_file_size();
    let too_large = state.files.size_limit_message();

    let mut upload: Option<UploadRequest> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, &too_large))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field.content_type().map(|s| s.to_string());
        let content = read_limited(&mut field, max_size, &too_large).await?;

        let mut request = UploadRequest::new(file_name, content);
        if let Some(mime) = mime_type {
            request = request.with_mime_type(mime);
        }
        upload = Some(request);
        break;
    }

    let upload = upload.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    let record = state.files.upload(upload, &user).await?;

    Ok(Json(FileUploadResponse {
        message: "File uploaded successfully".to_string(),
        data: record,
    }))
}

/// GET /api/v1/files - List the caller's files.
#[utoipa::path(
    get,
    path = "/api/v1/files",
    tag = "files",
    responses(
        (status = 200, description = "The caller's files, newest first", body = FileListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<FileListResponse>, ApiError> {
    let files = state.files.list_by_owner(&user).await?;
    Ok(Json(FileListResponse { data: files }))
}

/// GET /api/v1/files/{id} - Get a file's metadata.
#[utoipa::path(
    get,
    path = "/api/v1/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File metadata", body = FileDataResponse),
        (status = 400, description = "Invalid file ID"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<FileDataResponse>, ApiError> {
    let file_id = parse_file_id(&id)?;
    let record = state.files.get_owned(file_id, &user).await?;
    Ok(Json(FileDataResponse { data: record }))
}

/// GET /api/v1/files/{id}/download - Download a file's content.
#[utoipa::path(
    get,
    path = "/api/v1/files/{id}/download",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File content as an attachment"),
        (status = 400, description = "Invalid file ID"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let file_id = parse_file_id(&id)?;
    let download = state.files.download(file_id, &user).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, &download.record.mime_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&download.record.file_name),
        )
        .header(header::CONTENT_LENGTH, download.content.len())
        .body(Body::from(download.content))
        .map_err(|e| {
            tracing::error!("Failed to build download response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

/// DELETE /api/v1/files/{id} - Delete a file.
#[utoipa::path(
    delete,
    path = "/api/v1/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 400, description = "Invalid file ID"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let file_id = parse_file_id(&id)?;
    state.files.delete(file_id, &user).await?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}
