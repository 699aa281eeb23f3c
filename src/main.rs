use tracing::{error, info};

use filehub::web::WebServer;
use filehub::{Config, Database};

#[tokio::main]
async fn main() {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let mut config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    if let Err(e) = filehub::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        filehub::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    info!("filehub starting");
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let server = match WebServer::new(&config, db) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to start web server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!("Web server error: {}", e);
        std::process::exit(1);
    }

    info!("filehub stopped");
}
