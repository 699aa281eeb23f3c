//! Store trait definitions for filehub.
//!
//! Services depend on these traits rather than on the sqlx repositories
//! directly, so tests can substitute stores that fail on demand.

use async_trait::async_trait;

use crate::db::{NewUser, User};
use crate::file::{FileRecord, NewFile};
use crate::Result;

/// Persistence operations for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user.
    ///
    /// Fails with `DuplicateIdentity` if the email is already taken.
    async fn create(&self, new_user: &NewUser) -> Result<User>;

    /// Get a non-deleted user by ID.
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get a non-deleted user by email (case-insensitive).
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Check if an email is already taken, including by soft-deleted users.
    async fn email_exists(&self, email: &str) -> Result<bool>;
}

/// Persistence operations for file metadata.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Insert a metadata row.
    async fn create(&self, new_file: &NewFile) -> Result<FileRecord>;

    /// Get a non-deleted file by ID.
    async fn get_by_id(&self, id: i64) -> Result<Option<FileRecord>>;

    /// List non-deleted files owned by a user, newest first.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<FileRecord>>;

    /// Soft-delete a file. Returns false if no live file had this ID.
    async fn soft_delete(&self, id: i64) -> Result<bool>;
}
