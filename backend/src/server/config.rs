//! HTTP server configuration object and helpers.

use std::ffi::OsString;
use std::net::SocketAddr;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use color_eyre::eyre::{Result, eyre};
use messpro::domain::RateTable;
use messpro::outbound::persistence::DbPool;
use messpro::settings::MessproSettings;
use ortho_config::OrthoConfig;

/// Load [`MessproSettings`] from defaults, the config file, `MESSPRO_*`
/// variables and `args`, in increasing precedence.
pub fn load_settings<I>(args: I) -> Result<MessproSettings>
where
    I: IntoIterator<Item = OsString>,
{
    MessproSettings::load_from_iter(args).map_err(|err| eyre!("load MESSPRO settings: {err}"))
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) rates: RateTable,
    pub(crate) db_pool: Option<DbPool>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a configuration serving the in-process store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, rates: RateTable) -> Self {
        Self {
            bind_addr,
            rates,
            db_pool: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool; the Diesel repositories replace
    /// the in-process store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
