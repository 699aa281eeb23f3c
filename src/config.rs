//! Configuration module for filehub.

use serde::Deserialize;
use std::path::Path;

use crate::{FilehubError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origins. Empty means any origin, without credentials.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/filehub.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// File storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Path to the file storage directory.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_storage_path() -> String {
    "uploads".to_string()
}

fn default_max_upload_size() -> u64 {
    10
}

impl FilesConfig {
    /// Maximum upload size in bytes.
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1024 * 1024
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

/// Token signing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify tokens (must be set).
    #[serde(default)]
    pub jwt_secret: String,
    /// Token lifetime in hours.
    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,
}

fn default_jwt_expiration_hours() -> u64 {
    24
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            jwt_expiration_hours: default_jwt_expiration_hours(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file, written in addition to stdout.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// File storage configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Token configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FilehubError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FilehubError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `APP_HOST`, `APP_PORT`: listen address
    /// - `DB_PATH`: SQLite database file
    /// - `UPLOAD_DIR`: file storage directory
    /// - `JWT_SECRET_KEY`: token signing secret
    /// - `JWT_EXPIRATION_HOURS`: token lifetime
    /// - `LOG_LEVEL`: log level
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Empty values and values that fail to parse are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("APP_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("APP_PORT").and_then(|v| v.trim().parse().ok()) {
            self.server.port = port;
        }
        if let Some(path) = get("DB_PATH") {
            self.database.path = path;
        }
        if let Some(dir) = get("UPLOAD_DIR") {
            self.files.storage_path = dir;
        }
        if let Some(secret) = get("JWT_SECRET_KEY") {
            self.auth.jwt_secret = secret;
        }
        if let Some(hours) = get("JWT_EXPIRATION_HOURS").and_then(|v| v.trim().parse().ok()) {
            self.auth.jwt_expiration_hours = hours;
        }
        if let Some(level) = get("LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - the JWT secret is not set
    /// - the token lifetime is zero
    /// - the upload limit is zero
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(FilehubError::Config(
                "jwt_secret is not set. \
                 Set it in config.toml or via the JWT_SECRET_KEY environment variable."
                    .to_string(),
            ));
        }
        if self.auth.jwt_expiration_hours == 0 {
            return Err(FilehubError::Config(
                "jwt_expiration_hours must be greater than zero".to_string(),
            ));
        }
        if self.files.max_upload_size_mb == 0 {
            return Err(FilehubError::Config(
                "max_upload_size_mb must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
