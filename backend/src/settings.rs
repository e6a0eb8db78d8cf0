//! Server configuration loaded via OrthoConfig.
//!
//! Values come from `MESSPRO_*` environment variables, command-line flags or
//! a configuration file. Accessors fall back to defaults for anything unset.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{BillingError, RateTable};
use crate::outbound::persistence::DEFAULT_OPERATION_TIMEOUT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors raised when settings hold unusable values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The bind address did not parse.
    #[error("invalid bind address {value}: {message}")]
    BindAddr { value: String, message: String },
    /// A configured rate was not positive.
    #[error("invalid meal rates: {0}")]
    Rates(#[from] BillingError),
    /// A size or timeout was zero.
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
}

/// Configuration values for the HTTP server and its store.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MESSPRO")]
pub struct MessproSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; the in-process store is used when unset.
    pub database_url: Option<String>,
    /// Skip embedded migrations at start-up.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
    /// Largest number of pooled connections.
    pub pool_max_size: Option<u32>,
    /// Budget for each store operation, in milliseconds.
    pub store_timeout_ms: Option<u64>,
    /// Price of one breakfast.
    pub breakfast_rate: Option<u64>,
    /// Price of one lunch.
    pub lunch_rate: Option<u64>,
    /// Price of one dinner.
    pub dinner_rate: Option<u64>,
}

impl MessproSettings {
    /// Socket address to bind, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Largest pool size, defaulting to 10.
    pub fn pool_max_size(&self) -> Result<u32, SettingsError> {
        match self.pool_max_size {
            Some(0) => Err(SettingsError::NotPositive {
                field: "pool_max_size",
            }),
            Some(size) => Ok(size),
            None => Ok(DEFAULT_POOL_MAX_SIZE),
        }
    }

    /// Per-operation store budget, defaulting to five seconds.
    pub fn store_timeout(&self) -> Result<Duration, SettingsError> {
        match self.store_timeout_ms {
            Some(0) => Err(SettingsError::NotPositive {
                field: "store_timeout_ms",
            }),
            Some(ms) => Ok(Duration::from_millis(ms)),
            None => Ok(DEFAULT_OPERATION_TIMEOUT),
        }
    }

    /// Configured meal rates; unset rates keep their defaults.
    pub fn rates(&self) -> Result<RateTable, SettingsError> {
        let defaults = RateTable::default();
        Ok(RateTable::new(
            self.breakfast_rate.unwrap_or(defaults.breakfast()),
            self.lunch_rate.unwrap_or(defaults.lunch()),
            self.dinner_rate.unwrap_or(defaults.dinner()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "MESSPRO_BIND_ADDR",
        "MESSPRO_DATABASE_URL",
        "MESSPRO_SKIP_MIGRATIONS",
        "MESSPRO_POOL_MAX_SIZE",
        "MESSPRO_STORE_TIMEOUT_MS",
        "MESSPRO_BREAKFAST_RATE",
        "MESSPRO_LUNCH_RATE",
        "MESSPRO_DINNER_RATE",
        "MESSPRO_CONFIG_PATH",
    ];

    fn load_from_empty_args() -> MessproSettings {
        MessproSettings::load_from_iter([OsString::from("messpro")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal address")
        );
        assert_eq!(settings.database_url(), None);
        assert!(!settings.skip_migrations);
        assert_eq!(settings.pool_max_size(), Ok(DEFAULT_POOL_MAX_SIZE));
        assert_eq!(settings.store_timeout(), Ok(Duration::from_secs(5)));
        assert_eq!(settings.rates(), Ok(RateTable::default()));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("MESSPRO_BIND_ADDR", Some("127.0.0.1:3000".to_owned())),
            (
                "MESSPRO_DATABASE_URL",
                Some("postgres://mess@localhost/mess".to_owned()),
            ),
            ("MESSPRO_SKIP_MIGRATIONS", Some("true".to_owned())),
            ("MESSPRO_POOL_MAX_SIZE", Some("4".to_owned())),
            ("MESSPRO_STORE_TIMEOUT_MS", Some("250".to_owned())),
            ("MESSPRO_BREAKFAST_RATE", Some("25".to_owned())),
            ("MESSPRO_LUNCH_RATE", None),
            ("MESSPRO_DINNER_RATE", Some("60".to_owned())),
            ("MESSPRO_CONFIG_PATH", None),
        ]);

        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("configured address").port(),
            3000
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://mess@localhost/mess")
        );
        assert!(settings.skip_migrations);
        assert_eq!(settings.pool_max_size(), Ok(4));
        assert_eq!(settings.store_timeout(), Ok(Duration::from_millis(250)));
        let rates = settings.rates().expect("positive rates");
        assert_eq!((rates.breakfast(), rates.lunch(), rates.dinner()), (25, 50, 60));
    }

    #[rstest]
    #[case(MessproSettings { bind_addr: Some("not an address".into()), ..Default::default() })]
    fn malformed_bind_addresses_are_reported(#[case] settings: MessproSettings) {
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::BindAddr { .. })
        ));
    }

    #[rstest]
    fn zero_values_are_rejected() {
        let settings = MessproSettings {
            pool_max_size: Some(0),
            store_timeout_ms: Some(0),
            lunch_rate: Some(0),
            ..Default::default()
        };

        assert!(settings.pool_max_size().is_err());
        assert!(settings.store_timeout().is_err());
        assert_eq!(
            settings.rates(),
            Err(SettingsError::Rates(BillingError::NonPositiveRate { meal: "lunch" }))
        );
    }

    #[rstest]
    fn blank_database_urls_mean_in_process_store() {
        let settings = MessproSettings {
            database_url: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(settings.database_url(), None);
    }
}
