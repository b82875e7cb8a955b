//! Game server binary for the clicker backend.
//!
//! Wires together the configuration, the `PostgreSQL` store, the
//! identity provider and the HTTP layer.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `clicker-config.yaml`
//! 3. Connect to `PostgreSQL` and run migrations
//! 4. Seed the booster catalogs
//! 5. Construct the identity provider
//! 6. Serve the game API

mod seed;

use std::path::Path;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use clicker_api::auth::HttpIdentityProvider;
use clicker_api::server::start_server;
use clicker_api::state::AppState;
use clicker_db::{GameStore, PgStore, PostgresPool};
use clicker_engine::config::AppConfig;
use clicker_engine::levels::LevelProgressionTable;

/// Environment variable naming the configuration file.
const CONFIG_ENV: &str = "CLICKER_CONFIG";

/// Default configuration file path.
const CONFIG_PATH: &str = "./clicker-config.yaml";

/// Application entry point for the game server.
///
/// # Errors
///
/// Returns an error if any initialization step or the server itself
/// fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration first; the log filter comes from it.
    let config = load_config()?;

    // 2. Initialize structured logging.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    if config.logging.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!(
        host = config.server.host,
        port = config.server.port,
        "clicker-server starting"
    );

    // 3. Connect to PostgreSQL and run migrations.
    let pool = PostgresPool::connect_url(&config.infrastructure.postgres_url).await?;
    pool.run_migrations().await?;
    let store: Arc<dyn GameStore> = Arc::new(PgStore::new(pool));

    // 4. Seed the booster catalogs (idempotent upserts).
    seed::seed_catalog(store.as_ref()).await?;

    // 5. Identity provider against the auth service.
    let identity = Arc::new(HttpIdentityProvider::new(
        &config.infrastructure.auth_url,
        &config.infrastructure.auth_service_key,
    ));

    // 6. Serve.
    let state = Arc::new(AppState::new(
        store,
        identity,
        config.game.clone(),
        LevelProgressionTable::default(),
    ));
    start_server(&config.server, state).await?;

    info!("clicker-server stopped");
    Ok(())
}

/// Load the application configuration.
///
/// The path comes from the `CLICKER_CONFIG` environment variable,
/// falling back to `./clicker-config.yaml`. A missing file is not an
/// error: defaults (plus environment overrides) apply.
fn load_config() -> Result<AppConfig, clicker_engine::config::ConfigError> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| String::from(CONFIG_PATH));
    if Path::new(&path).exists() {
        AppConfig::from_file(Path::new(&path))
    } else {
        let mut config = AppConfig::default();
        config.infrastructure.apply_env_overrides();
        Ok(config)
    }
}
