//! Registration and login.

use std::sync::Arc;

use tracing::{info, warn};

use super::password::{hash_password, verify_dummy_password, verify_password, PasswordError};
use super::token::TokenService;
use crate::db::{NewUser, User, UserStore};
use crate::{FilehubError, Result};

/// Identity service handling account creation and credential checks.
pub struct IdentityService {
    users: Arc<dyn UserStore>,
    tokens: Arc<TokenService>,
}

impl IdentityService {
    /// Create a new IdentityService.
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Register a new account.
    ///
    /// The email is trimmed and compared case-insensitively. The password is
    /// hashed before it reaches the store.
    pub async fn register(&self, email: &str, password: &str) -> Result<User> {
        let email = email.trim();
        if email.is_empty() {
            return Err(FilehubError::Validation("email is required".to_string()));
        }

        if self.users.email_exists(email).await? {
            return Err(FilehubError::DuplicateIdentity);
        }

        let password_hash = hash_password_blocking(password.to_string()).await?;

        // The unique index still guards against a concurrent registration.
        let user = self.users.create(&NewUser::new(email, password_hash)).await?;
        info!(user_id = user.id, "user registered");

        Ok(user)
    }

    /// Check credentials and issue a bearer token.
    ///
    /// Unknown emails and wrong passwords fail identically, and both cost
    /// one password verification.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let Some(user) = self.users.get_by_email(email.trim()).await? else {
            let password = password.to_string();
            tokio::task::spawn_blocking(move || verify_dummy_password(&password))
                .await
                .map_err(|e| FilehubError::Hashing(e.to_string()))?;
            return Err(FilehubError::InvalidCredentials);
        };

        let hash = user.password.clone();
        let password = password.to_string();
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|e| FilehubError::Hashing(e.to_string()))?;

        match verified {
            Ok(()) => {}
            Err(PasswordError::InvalidHash) => {
                warn!(user_id = user.id, "stored password hash is malformed");
                return Err(FilehubError::InvalidCredentials);
            }
            Err(_) => return Err(FilehubError::InvalidCredentials),
        }

        let token = self.tokens.issue(user.id)?;
        info!(user_id = user.id, "user logged in");

        Ok(token)
    }
}

/// Hash a password on the blocking thread pool.
async fn hash_password_blocking(password: String) -> Result<String> {
    let hashed = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| FilehubError::Hashing(e.to_string()))?;

    hashed.map_err(|e| match e {
        PasswordError::TooShort | PasswordError::TooLong => {
            FilehubError::Validation(e.to_string())
        }
        other => FilehubError::Hashing(other.to_string()),
    })
}
