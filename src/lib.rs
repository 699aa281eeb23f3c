//! filehub - per-user file storage over HTTP
//!
//! Accounts register and log in with an email and password, receive a signed
//! bearer token, and upload, list, download and delete their own files.
//! Metadata lives in SQLite; file bytes live on local disk.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use auth::{AuthenticatedUser, IdentityService, TokenService};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{FilehubError, Result};
pub use file::{FileRecord, FileRepository, FileService, FileStorage};
