//! HTTP API for filehub.
//!
//! Registration and login under `/api/v1/auth`, owner-scoped file storage
//! under `/api/v1/files`, plus `/ping`, `/health` and the OpenAPI document.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::{create_app, create_router};
pub use server::{build_state, WebServer};
