//! Authentication module for filehub.
//!
//! This module provides password hashing, bearer token issuance and
//! verification, and the registration/login service.

mod password;
mod service;
mod token;

pub use password::{
    hash_password, validate_password, verify_dummy_password, verify_password, PasswordError,
    MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
pub use service::IdentityService;
pub use token::{AuthenticatedUser, Claims, TokenService};
