//! Backend entry-point: loads settings, prepares the store and serves the
//! REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use marketplace::inbound::http::health::HealthState;
use marketplace::outbound::persistence::{DbPool, run_pending_migrations_async};
use server::{AppSettings, ServerConfig, create_server, seed_example_data};

/// Application bootstrap.
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

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr = settings
        .bind_addr()
        .wrap_err("MARKETPLACE_BIND_ADDR is not a socket address")?;

    let mut config = ServerConfig::new(bind_addr);
    if let Some(pool_config) = settings.pool_config() {
        if settings.run_migrations {
            let applied = run_pending_migrations_async(pool_config.database_url().to_owned())
                .await
                .wrap_err("failed to apply migrations")?;
            info!(applied, "database migrations applied");
        }
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    } else {
        warn!("no database configured; serving from the in-memory store");
    }

    if settings.seed_example_data {
        let result = seed_example_data(&config)
            .await
            .wrap_err("failed to seed example data")?;
        info!(?result, "example data seeding checked");
    }

    info!(
        addr = %config.bind_addr(),
        database = config.uses_database(),
        "starting marketplace server"
    );
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await?;
    Ok(())
}
