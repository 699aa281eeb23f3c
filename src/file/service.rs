//! File service for filehub.
//!
//! This module provides the file lifecycle:
//! - Upload with size checks, byte write, then metadata insert
//! - Listing and lookup of the caller's files
//! - Download and deletion, both gated on ownership

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::auth::AuthenticatedUser;
use crate::db::FileStore;
use crate::{FilehubError, Result};

use super::metadata::{FileRecord, NewFile};
use super::storage::{FileStorage, MAX_STORAGE_PATH_BYTES};
use super::{normalize_file_name, DEFAULT_MAX_FILE_SIZE};

/// Fallback MIME type when the client declares none and the extension is unknown.
const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Request data for file upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Client-supplied file name.
    pub file_name: String,
    /// Client-declared MIME type, if any.
    pub mime_type: Option<String>,
    /// File content.
    pub content: Vec<u8>,
}

impl UploadRequest {
    /// Create a new upload request.
    pub fn new(file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            content,
        }
    }

    /// Set the declared MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }
}

/// Result of a file download.
#[derive(Debug)]
pub struct Download {
    /// File metadata.
    pub record: FileRecord,
    /// File content.
    pub content: Vec<u8>,
}

/// File service for managing uploads, downloads and deletion.
pub struct FileService {
    files: Arc<dyn FileStore>,
    storage: FileStorage,
    max_file_size: u64,
}

impl FileService {
    /// Create a new FileService with the default size limit.
    pub fn new(files: Arc<dyn FileStore>, storage: FileStorage) -> Self {
        Self {
            files,
            storage,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set a custom max file size in bytes.
    pub fn with_max_file_size(mut self, max_size: u64) -> Self {
        self.max_file_size = max_size;
        self
    }

    /// Get the configured max file size.
    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Get the storage used by this service.
    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    /// Message used when an upload is over the size limit.
    pub fn size_limit_message(&self) -> String {
        format!(
            "File size exceeds the limit of {}MB",
            self.max_file_size / 1024 / 1024
        )
    }

    /// Upload a file for `owner`.
    ///
    /// Size and name are validated before anything touches the disk. If the
    /// metadata insert fails, the bytes just written are removed again.
    pub async fn upload(
        &self,
        request: UploadRequest,
        owner: &AuthenticatedUser,
    ) -> Result<FileRecord> {
        if request.content.is_empty() {
            return Err(FilehubError::Validation("file is empty".to_string()));
        }
        if request.content.len() as u64 > self.max_file_size {
            return Err(FilehubError::Validation(self.size_limit_message()));
        }

        let file_name = normalize_file_name(&request.file_name)?;
        let mime_type = resolve_mime_type(request.mime_type.as_deref(), &file_name);
        let storage_path = format!("{}-{}-{}", owner.user_id, Utc::now().timestamp(), file_name);
        if storage_path.len() > MAX_STORAGE_PATH_BYTES {
            return Err(FilehubError::Validation("file name is too long".to_string()));
        }

        self.storage.save(&request.content, &storage_path).await?;

        let new_file = NewFile {
            file_name,
            size: request.content.len() as i64,
            mime_type,
            storage_path,
            owner_id: owner.user_id,
        };

        match self.files.create(&new_file).await {
            Ok(record) => {
                info!(
                    file_id = record.id,
                    owner_id = owner.user_id,
                    size = record.size,
                    "file uploaded"
                );
                Ok(record)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&new_file.storage_path).await {
                    warn!(
                        storage_path = %new_file.storage_path,
                        "failed to remove orphaned upload: {}",
                        cleanup
                    );
                }
                Err(match e {
                    FilehubError::Persistence(_) => e,
                    other => FilehubError::Persistence(other.to_string()),
                })
            }
        }
    }

    /// List the caller's files, newest first.
    pub async fn list_by_owner(&self, owner: &AuthenticatedUser) -> Result<Vec<FileRecord>> {
        self.files.list_by_owner(owner.user_id).await
    }

    /// Get a file's metadata by ID, regardless of owner.
    pub async fn get_by_id(&self, file_id: i64) -> Result<FileRecord> {
        self.files
            .get_by_id(file_id)
            .await?
            .ok_or_else(|| FilehubError::NotFound("File".to_string()))
    }

    /// Get a file's metadata, requiring that `requester` owns it.
    pub async fn get_owned(
        &self,
        file_id: i64,
        requester: &AuthenticatedUser,
    ) -> Result<FileRecord> {
        let record = self.get_by_id(file_id).await?;
        if record.owner_id != requester.user_id {
            return Err(FilehubError::Permission(
                "You are not authorized to access this file".to_string(),
            ));
        }
        Ok(record)
    }

    /// Download a file owned by `requester`.
    pub async fn download(
        &self,
        file_id: i64,
        requester: &AuthenticatedUser,
    ) -> Result<Download> {
        let record = self.get_by_id(file_id).await?;
        if record.owner_id != requester.user_id {
            return Err(FilehubError::Permission(
                "You are not authorized to download this file".to_string(),
            ));
        }

        let content = self.storage.load(&record.storage_path).await?;

        Ok(Download { record, content })
    }

    /// Delete a file owned by `requester`.
    ///
    /// Byte removal is best-effort; the record is soft-deleted either way.
    pub async fn delete(&self, file_id: i64, requester: &AuthenticatedUser) -> Result<()> {
        let record = self.get_by_id(file_id).await?;
        if record.owner_id != requester.user_id {
            return Err(FilehubError::Permission(
                "You do not own this file".to_string(),
            ));
        }

        match self.storage.delete(&record.storage_path).await {
            Ok(true) => {}
            Ok(false) => warn!(
                file_id,
                storage_path = %record.storage_path,
                "file bytes were already missing"
            ),
            Err(e) => warn!(
                file_id,
                storage_path = %record.storage_path,
                "failed to remove file bytes: {}",
                e
            ),
        }

        if !self.files.soft_delete(file_id).await? {
            return Err(FilehubError::NotFound("File".to_string()));
        }

        info!(file_id, owner_id = requester.user_id, "file deleted");
        Ok(())
    }
}

/// Pick the declared MIME type, else guess from the extension.
fn resolve_mime_type(declared: Option<&str>, file_name: &str) -> String {
    match declared.map(str::trim) {
        Some(mime) if !mime.is_empty() => mime.to_string(),
        _ => mime_guess::from_path(file_name)
            .first_raw()
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string(),
    }
}
