//! User model for filehub.

/// User entity representing a registered account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Login email (unique, case-insensitive).
    pub email: String,
    /// Password hash (Argon2id PHC string).
    pub password: String,
    /// Account creation timestamp.
    pub created_at: String,
    /// Last modification timestamp.
    pub updated_at: String,
    /// Soft-delete marker.
    pub deleted_at: Option<String>,
}

impl User {
    /// Check if this account has been soft-deleted.
    #[cfg(test)]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login email.
    pub email: String,
    /// Password hash (already hashed).
    pub password: String,
}

impl NewUser {
    /// Create a new user with an email and an already-hashed password.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user() {
        let user = NewUser::new("a@x.com", "$argon2id$hash");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.password, "$argon2id$hash");
    }

    #[test]
    fn test_is_deleted() {
        let mut user = User {
            id: 1,
            email: "a@x.com".to_string(),
            password: "hash".to_string(),
            created_at: "2024-01-01 00:00:00".to_string(),
            updated_at: "2024-01-01 00:00:00".to_string(),
            deleted_at: None,
        };
        assert!(!user.is_deleted());

        user.deleted_at = Some("2024-01-02 00:00:00".to_string());
        assert!(user.is_deleted());
    }
}
