//! Error types for filehub.

use thiserror::Error;

/// Common error type for filehub.
#[derive(Error, Debug)]
pub enum FilehubError {
    /// Store read or write failed.
    ///
    /// Errors from sqlx are automatically converted into this variant.
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing, malformed or expired bearer token.
    #[error("authentication error: {0}")]
    Auth(String),

    /// The caller is authenticated but does not own the resource.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// An account with this email already exists.
    #[error("user with this email already exists")]
    DuplicateIdentity,

    /// Unknown email or wrong password. Deliberately does not say which.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing primitive failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),

    /// Token signing failed.
    #[error("token issuance failed: {0}")]
    TokenIssuance(String),

    /// Writing file bytes to storage failed.
    #[error("storage write failed: {0}")]
    StorageWrite(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for FilehubError {
    fn from(e: sqlx::Error) -> Self {
        FilehubError::Persistence(e.to_string())
    }
}

/// Result type alias for filehub operations.
pub type Result<T> = std::result::Result<T, FilehubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_display() {
        let err = FilehubError::Auth("invalid token".to_string());
        assert_eq!(err.to_string(), "authentication error: invalid token");
    }

    #[test]
    fn test_permission_error_display() {
        let err = FilehubError::Permission("you do not own this file".to_string());
        assert_eq!(err.to_string(), "permission denied: you do not own this file");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = FilehubError::NotFound("file".to_string());
        assert_eq!(err.to_string(), "file not found");
    }

    #[test]
    fn test_credentials_errors_display() {
        assert_eq!(
            FilehubError::InvalidCredentials.to_string(),
            "invalid credentials"
        );
        assert_eq!(
            FilehubError::DuplicateIdentity.to_string(),
            "user with this email already exists"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: FilehubError = io_err.into();
        assert!(matches!(err, FilehubError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: FilehubError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, FilehubError::Persistence(_)));
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        fn sample_err() -> Result<i32> {
            Err(FilehubError::StorageWrite("disk full".to_string()))
        }

        assert_eq!(sample_ok().unwrap(), 42);
        assert!(sample_err().is_err());
    }
}
