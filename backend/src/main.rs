//! Backend entry point: loads settings, prepares storage, serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use enrollment_backend::inbound::http::health::HealthState;
use enrollment_backend::inbound::http::session_config::{BuildMode, session_settings};
use enrollment_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use enrollment_backend::settings::ServerSettings;

use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load settings")?;
    let session = session_settings(&settings, BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(session, bind_addr);

    if let Some(database_url) = settings.database_url.as_deref() {
        let applied = run_pending_migrations(database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
        info!(applied, "database migrations applied");
        let pool_config = PoolConfig::new(database_url).with_max_size(settings.pool_max_size()?);
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "enrollment backend listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("server terminated with an error")
}
