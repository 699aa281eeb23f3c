//! API handlers.

pub mod auth;
pub mod file;
pub mod health;

pub use auth::*;
pub use file::*;
pub use health::*;

use std::sync::Arc;

use crate::auth::IdentityService;
use crate::file::FileService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Registration and login.
    pub identity: Arc<IdentityService>,
    /// File lifecycle.
    pub files: Arc<FileService>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(identity: Arc<IdentityService>, files: Arc<FileService>) -> Self {
        Self { identity, files }
    }
}
