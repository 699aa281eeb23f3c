//! File storage for filehub.
//!
//! Bytes live in a single flat directory, one file per storage path:
//! ```text
//! {base_path}/
//! ├── 1-1717171717-note.txt
//! ├── 2-1717171800-report.pdf
//! └── ...
//! ```
//! Writes go to a hidden temporary file first and are linked into place,
//! so a storage path either holds the complete content or does not exist,
//! and an existing path is never replaced.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::warn;
use uuid::Uuid;

use crate::{FilehubError, Result};

/// Longest storage path in bytes; a single file name on common filesystems.
pub const MAX_STORAGE_PATH_BYTES: usize = 255;

/// File storage service for managing physical files.
#[derive(Debug, Clone)]
pub struct FileStorage {
    /// Base directory for file storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new FileStorage with the given base path.
    ///
    /// The base directory will be created if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the base path of this storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write `content` under `storage_path`.
    ///
    /// Fails with `StorageWrite` if the path is already taken; existing
    /// content is never overwritten.
    pub async fn save(&self, content: &[u8], storage_path: &str) -> Result<()> {
        let file_path = self.get_file_path(storage_path)?;
        let temp_path = self.base_path.join(format!(".{}.part", Uuid::new_v4()));

        if let Err(e) = fs::write(&temp_path, content).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(FilehubError::StorageWrite(format!(
                "failed to write {storage_path}: {e}"
            )));
        }

        // Unlike rename, hard_link fails when the target exists, so two
        // writers racing for one storage path cannot replace each other.
        let linked = fs::hard_link(&temp_path, &file_path).await;
        if let Err(e) = fs::remove_file(&temp_path).await {
            warn!(temp = %temp_path.display(), "failed to remove temporary upload: {}", e);
        }

        match linked {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(FilehubError::StorageWrite(
                format!("storage path already exists: {storage_path}"),
            )),
            Err(e) => Err(FilehubError::StorageWrite(format!(
                "failed to move {storage_path} into place: {e}"
            ))),
        }
    }

    /// Load content from storage.
    pub async fn load(&self, storage_path: &str) -> Result<Vec<u8>> {
        let file_path = self.get_file_path(storage_path)?;

        match fs::read(&file_path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(FilehubError::NotFound("File".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a file from storage.
    ///
    /// Returns `true` if the file was deleted, `false` if it didn't exist.
    pub async fn delete(&self, storage_path: &str) -> Result<bool> {
        let file_path = self.get_file_path(storage_path)?;

        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a file exists in storage.
    #[cfg(test)]
    pub async fn exists(&self, storage_path: &str) -> bool {
        match self.get_file_path(storage_path) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Resolve a storage path to a location under the base directory.
    ///
    /// Storage paths are single file names; anything that could escape the
    /// base directory is rejected.
    pub fn get_file_path(&self, storage_path: &str) -> Result<PathBuf> {
        if storage_path.is_empty()
            || storage_path.len() > MAX_STORAGE_PATH_BYTES
            || storage_path.contains(['/', '\\'])
            || storage_path == "."
            || storage_path == ".."
        {
            return Err(FilehubError::Validation(format!(
                "invalid storage path: {storage_path}"
            )));
        }

        Ok(self.base_path.join(storage_path))
    }
}
