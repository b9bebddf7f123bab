//! Backend entry-point: loads settings, prepares storage and serves the REST
//! API with health probes and (in debug builds) Swagger UI.

mod server;

use std::ffi::OsString;
use std::net::SocketAddr;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use calibration_tracker::inbound::http::health::HealthState;
use calibration_tracker::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use calibration_tracker::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter([OsString::from("calibration-tracker")])
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr: SocketAddr = settings.bind_address().parse().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid bind address {}: {e}", settings.bind_address()),
        )
    })?;
    let mapping = settings
        .import_mapping()
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let mut config = ServerConfig::new(bind_addr, settings.upload_limit_bytes())
        .with_import_mapping(mapping);
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(prepare_database(database_url, settings.pool_max_size()).await?);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "calibration tracker listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

async fn prepare_database(database_url: &str, max_size: u32) -> std::io::Result<DbPool> {
    let migration_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
        .await
        .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    DbPool::new(PoolConfig::new(database_url).with_max_size(max_size))
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))
}
