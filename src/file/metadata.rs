//! File metadata for filehub.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

use crate::db::FileStore;
use crate::{FilehubError, Result};

const FILE_COLUMNS: &str =
    "id, file_name, size, mime_type, storage_path, owner_id, created_at, updated_at, deleted_at";

/// Metadata for a stored file.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct FileRecord {
    /// Unique file ID.
    pub id: i64,
    /// Client-supplied file name (final path component only).
    pub file_name: String,
    /// Size in bytes.
    pub size: i64,
    /// MIME type.
    pub mime_type: String,
    /// Key locating the bytes in storage.
    pub storage_path: String,
    /// Owning user ID.
    pub owner_id: i64,
    /// Upload timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
    /// Soft-delete marker.
    #[serde(skip)]
    pub deleted_at: Option<String>,
}

impl FileRecord {
    /// Check if this file has been soft-deleted.
    #[cfg(test)]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data for creating a new file record.
#[derive(Debug, Clone)]
pub struct NewFile {
    /// File name.
    pub file_name: String,
    /// Size in bytes.
    pub size: i64,
    /// MIME type.
    pub mime_type: String,
    /// Storage path.
    pub storage_path: String,
    /// Owning user ID.
    pub owner_id: i64,
}

/// Repository for file metadata.
#[derive(Clone)]
pub struct FileRepository {
    pool: SqlitePool,
}

impl FileRepository {
    /// Create a new FileRepository on the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for FileRepository {
    async fn create(&self, new_file: &NewFile) -> Result<FileRecord> {
        let result = sqlx::query(
            "INSERT INTO files (file_name, size, mime_type, storage_path, owner_id)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&new_file.file_name)
        .bind(new_file.size)
        .bind(&new_file.mime_type)
        .bind(&new_file.storage_path)
        .bind(new_file.owner_id)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| FilehubError::NotFound("File".to_string()))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<FileRecord>> {
        let sql = format!("SELECT {FILE_COLUMNS} FROM files WHERE id = ? AND deleted_at IS NULL");
        let result = sqlx::query_as::<_, FileRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<FileRecord>> {
        let sql = format!(
            "SELECT {FILE_COLUMNS} FROM files
             WHERE owner_id = ? AND deleted_at IS NULL
             ORDER BY created_at DESC, id DESC"
        );
        let files = sqlx::query_as::<_, FileRecord>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(files)
    }

    async fn soft_delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE files SET deleted_at = datetime('now'), updated_at = datetime('now')
             WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
