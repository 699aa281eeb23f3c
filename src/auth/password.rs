//! Password hashing and validation for filehub.
//!
//! Uses Argon2id with a random per-password salt.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use rand_core::OsRng;
use std::sync::OnceLock;
use thiserror::Error;

/// Minimum password length in bytes.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length in bytes.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    TooLong,

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),

    /// Stored hash is not a valid PHC string.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Password does not match the stored hash.
    #[error("password verification failed")]
    VerificationFailed,
}

/// Create the Argon2id hasher.
///
/// Memory cost 19 MiB, 2 iterations, 1 lane.
fn create_argon2() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(19 * 1024, 2, 1, None)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

/// Hash a password using Argon2id.
///
/// Returns a PHC-formatted hash string that includes the salt and parameters.
///
/// # Examples
///
/// ```
/// use filehub::auth::hash_password;
///
/// let hash = hash_password("secret1").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = create_argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    // Parameters come from the parsed hash.
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

/// Verify `password` against a fixed throwaway hash, discarding the outcome.
///
/// Costs the same as [`verify_password`] on a real stored hash, for callers
/// that have no account to check against.
pub fn verify_dummy_password(password: &str) {
    if let Some(hash) = dummy_hash() {
        let _ = verify_password(password, hash);
    }
}

/// Hash of an unguessable password, created with the same parameters as real hashes.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    DUMMY_HASH
        .get_or_init(|| hash_password(&uuid::Uuid::new_v4().to_string()).ok())
        .as_deref()
}

/// Validate password length (6 to 128 bytes).
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong);
    }
    Ok(())
}
