//! MediBook server — appointment booking backend.
//!
//! Entry point: loads configuration, initializes logging, connects to
//! PostgreSQL, runs migrations, and starts the HTTP/WebSocket server.

use tracing_subscriber::{fmt, EnvFilter};

use medibook_core::config::AppConfig;
use medibook_core::error::AppError;
use medibook_database::{connection, migration};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment.
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("MEDIBOOK_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    AppConfig::load(&config_path)
}

/// Initialize tracing output per configuration.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting MediBook v{}", env!("CARGO_PKG_VERSION"));

    let pool = connection::create_pool(&config.database).await?;
    migration::run_migrations(&pool).await?;

    medibook_api::run_server(config, pool).await
}
