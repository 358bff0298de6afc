//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MARKETPLACE_*` environment variables and an
//! optional configuration file, in increasing order of precedence from file
//! to CLI.

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use marketplace::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Start-up settings for the marketplace server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MARKETPLACE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub db_max_connections: Option<u32>,
    /// Idle connections kept open.
    pub db_min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub db_connect_timeout_secs: Option<u64>,
    /// Apply embedded migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Load the demo dataset into an empty store.
    #[ortho_config(default = false)]
    pub seed_example_data: bool,
}

impl AppSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Pool settings when a database URL is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?;
        let mut config = PoolConfig::new(url);
        if let Some(max) = self.db_max_connections {
            config = config.with_max_size(max);
        }
        if let Some(idle) = self.db_min_idle {
            config = config.with_min_idle(Some(idle));
        }
        if let Some(secs) = self.db_connect_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        Some(config)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "MARKETPLACE_BIND_ADDR",
        "MARKETPLACE_DATABASE_URL",
        "MARKETPLACE_DB_MAX_CONNECTIONS",
        "MARKETPLACE_DB_MIN_IDLE",
        "MARKETPLACE_DB_CONNECT_TIMEOUT_SECS",
        "MARKETPLACE_RUN_MIGRATIONS",
        "MARKETPLACE_SEED_EXAMPLE_DATA",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("marketplace")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("socket address")
        );
        assert!(settings.pool_config().is_none());
        assert!(settings.run_migrations);
        assert!(!settings.seed_example_data);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("MARKETPLACE_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "MARKETPLACE_DATABASE_URL",
                Some("postgres://localhost/marketplace".to_owned()),
            ),
            ("MARKETPLACE_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("MARKETPLACE_DB_MIN_IDLE", Some("8".to_owned())),
            ("MARKETPLACE_DB_CONNECT_TIMEOUT_SECS", Some("5".to_owned())),
            ("MARKETPLACE_RUN_MIGRATIONS", Some("false".to_owned())),
            ("MARKETPLACE_SEED_EXAMPLE_DATA", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("configured address").port(),
            9000
        );
        let pool = settings.pool_config().expect("database configured");
        assert_eq!(pool.database_url(), "postgres://localhost/marketplace");
        assert_eq!(pool.max_size(), 4);
        assert_eq!(pool.min_idle(), Some(4));
        assert_eq!(pool.connection_timeout(), Duration::from_secs(5));
        assert!(!settings.run_migrations);
        assert!(settings.seed_example_data);
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env(
            VARS.map(|name| (name, (name == "MARKETPLACE_BIND_ADDR").then(|| "nowhere".to_owned()))),
        );

        let settings = load_from_empty_args();
        assert!(settings.bind_addr().is_err());
    }
}
