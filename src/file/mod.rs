//! File management module for filehub.
//!
//! This module provides per-user file handling:
//! - Metadata records in the `files` table
//! - Byte storage on local disk, keyed by storage path
//! - Ownership-checked download and deletion

mod metadata;
mod service;
mod storage;

pub use metadata::{FileRecord, FileRepository, NewFile};
pub use service::{Download, FileService, UploadRequest};
pub use storage::FileStorage;

use crate::{FilehubError, Result};

/// Maximum length for filename (in characters).
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Default maximum file size (10MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Reduce a client-supplied file name to its final path component.
///
/// Both `/` and `\` count as separators. Empty names, `.` and `..` are
/// rejected, as are names longer than [`MAX_FILENAME_LENGTH`].
pub fn normalize_file_name(name: &str) -> Result<String> {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "." || base == ".." {
        return Err(FilehubError::Validation(
            "file name must not be empty".to_string(),
        ));
    }
    if base.chars().any(char::is_control) {
        return Err(FilehubError::Validation(
            "file name contains control characters".to_string(),
        ));
    }
    if base.chars().count() > MAX_FILENAME_LENGTH {
        return Err(FilehubError::Validation(format!(
            "file name must be at most {MAX_FILENAME_LENGTH} characters"
        )));
    }

    Ok(base.to_string())
}
