//! Web server for filehub.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::auth::{IdentityService, TokenService};
use crate::config::Config;
use crate::db::{FileStore, UserRepository, UserStore};
use crate::file::{FileRepository, FileService, FileStorage};
use crate::{Database, FilehubError, Result};

use super::handlers::AppState;
use super::router::create_app;

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Token service used by the auth middleware.
    tokens: Arc<TokenService>,
    /// CORS allowed origins.
    cors_origins: Vec<String>,
}

impl WebServer {
    /// Create a new web server, wiring stores and services from `config`.
    pub fn new(config: &Config, db: Database) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse::<SocketAddr>()
            .map_err(|e| FilehubError::Config(format!("invalid server address: {e}")))?;

        let storage = FileStorage::new(&config.files.storage_path)?;
        tracing::info!("File storage initialized at: {}", config.files.storage_path);

        let tokens = Arc::new(TokenService::new(
            &config.auth.jwt_secret,
            config.auth.jwt_expiration_hours,
        ));
        let app_state = build_state(
            &db,
            storage,
            tokens.clone(),
            config.files.max_upload_size_bytes(),
        );

        Ok(Self {
            addr,
            app_state: Arc::new(app_state),
            tokens,
            cors_origins: config.server.cors_origins.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Build the application router.
    pub fn router(&self) -> Router {
        create_app(
            self.app_state.clone(),
            self.tokens.clone(),
            &self.cors_origins,
        )
    }

    /// Run the web server.
    pub async fn run(self) -> std::result::Result<(), std::io::Error> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::result::Result<SocketAddr, std::io::Error> {
        let router = self.router();

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

/// Wire stores and services into the shared handler state.
pub fn build_state(
    db: &Database,
    storage: FileStorage,
    tokens: Arc<TokenService>,
    max_upload_size: u64,
) -> AppState {
    let users: Arc<dyn UserStore> = Arc::new(UserRepository::new(db.pool().clone()));
    let files: Arc<dyn FileStore> = Arc::new(FileRepository::new(db.pool().clone()));

    let identity = IdentityService::new(users, tokens);
    let file_service = FileService::new(files, storage).with_max_file_size(max_upload_size);

    AppState::new(Arc::new(identity), Arc::new(file_service))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 0;
        config.files.storage_path = temp_dir.path().join("uploads").display().to_string();
        config.auth.jwt_secret = "test-secret".to_string();
        config
    }

    #[tokio::test]
    async fn test_new_creates_storage_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let db = Database::open_in_memory().await.unwrap();

        let server = WebServer::new(&config, db).unwrap();

        assert!(temp_dir.path().join("uploads").exists());
        assert_eq!(server.addr().port(), 0);
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir);
        config.server.host = "not an address".to_string();
        let db = Database::open_in_memory().await.unwrap();

        assert!(matches!(
            WebServer::new(&config, db),
            Err(FilehubError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_run_with_addr_binds_port() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let db = Database::open_in_memory().await.unwrap();

        let addr = WebServer::new(&config, db)
            .unwrap()
            .run_with_addr()
            .await
            .unwrap();

        assert_ne!(addr.port(), 0);
    }
}
