//! Backend entry-point: loads settings, prepares the store and serves the REST API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetricsBuilder;
#[cfg(feature = "metrics")]
use color_eyre::eyre::eyre;
use color_eyre::eyre::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use messpro::inbound::http::health::HealthState;
use messpro::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use messpro::settings::MessproSettings;
use server::{ServerConfig, create_server, load_settings};

async fn connect_store(settings: &MessproSettings, database_url: &str) -> Result<DbPool> {
    if settings.skip_migrations {
        warn!("skipping database migrations");
    } else {
        run_pending_migrations(database_url)
            .await
            .wrap_err("apply database migrations")?;
    }

    let config = PoolConfig::new(database_url)
        .with_max_size(settings.pool_max_size()?)
        .with_operation_timeout(settings.store_timeout()?);
    DbPool::new(config).await.wrap_err("create database pool")
}

#[cfg(feature = "metrics")]
fn make_metrics() -> Result<actix_web_prom::PrometheusMetrics> {
    PrometheusMetricsBuilder::new("messpro")
        .endpoint("/metrics")
        .build()
        .map_err(|err| eyre!("configure Prometheus metrics: {err}"))
}

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

    let settings = load_settings(std::env::args_os())?;
    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(bind_addr, settings.rates()?);
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(connect_store(&settings, database_url).await?);
    }
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(make_metrics()?));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("start HTTP server")?;
    info!(%bind_addr, "listening");
    server.await.wrap_err("serve HTTP")
}
