//! User repository for filehub.
//!
//! This module provides CRUD operations for users in the database.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::repository_traits::UserStore;
use super::user::{NewUser, User};
use crate::{FilehubError, Result};

const USER_COLUMNS: &str = "id, email, password, created_at, updated_at, deleted_at";

/// Repository for user CRUD operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new UserRepository on the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, new_user: &NewUser) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (email, password) VALUES (?, ?)")
            .bind(&new_user.email)
            .bind(&new_user.password)
            .execute(&self.pool)
            .await
            .map_err(|e| match e.as_database_error() {
                Some(db_err) if db_err.is_unique_violation() => FilehubError::DuplicateIdentity,
                _ => FilehubError::Persistence(e.to_string()),
            })?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| FilehubError::NotFound("user".to_string()))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ? AND deleted_at IS NULL");
        let result = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ? COLLATE NOCASE AND deleted_at IS NULL"
        );
        let result = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ? COLLATE NOCASE)")
                .bind(email)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
