//! Signed bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the user id (`sub`), the issue time and an
//! expiry `ttl_hours` later. Verification checks the signature and the expiry
//! with no leeway.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{FilehubError, Result};

/// JWT claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID.
    pub sub: i64,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiration time (unix seconds).
    pub exp: i64,
}

/// The identity extracted from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// ID of the user the token was issued to.
    pub user_id: i64,
}

/// Issues and verifies bearer tokens.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_hours: u64,
}

impl TokenService {
    /// Create a token service signing with `secret`.
    pub fn new(secret: &str, ttl_hours: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        // `sub` is numeric; its presence is enforced by deserializing `Claims`.
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_hours,
        }
    }

    /// Token lifetime in hours.
    pub fn ttl_hours(&self) -> u64 {
        self.ttl_hours
    }

    /// Issue a token for `user_id`, valid from now.
    pub fn issue(&self, user_id: i64) -> Result<String> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issue a token for `user_id` as if it had been issued at `issued_at`.
    pub fn issue_at(&self, user_id: i64, issued_at: DateTime<Utc>) -> Result<String> {
        let ttl = i64::try_from(self.ttl_hours)
            .map_err(|_| FilehubError::TokenIssuance("token lifetime too large".to_string()))?;
        let expires_at = issued_at + Duration::hours(ttl);

        let claims = Claims {
            sub: user_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| FilehubError::TokenIssuance(e.to_string()))
    }

    /// Verify a token and return the identity it carries.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => FilehubError::Auth("token has expired".to_string()),
                _ => FilehubError::Auth("invalid token".to_string()),
            }
        })?;

        Ok(AuthenticatedUser {
            user_id: data.claims.sub,
        })
    }
}
