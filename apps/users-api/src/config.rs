use core_config::tracing::LogConfig;
use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::common::RetryConfig;
use database::postgres::PostgresConfig;
use std::fmt;
use std::str::FromStr;

pub use core_config::Environment;

/// Where users are stored, selected with `STORAGE_BACKEND`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(format!(
                "unknown storage backend '{}', expected postgres or memory",
                other
            )),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Postgres => write!(f, "postgres"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` and `database` libraries
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub logging: LogConfig,
    pub storage: StorageBackend,
    pub database: PostgresConfig,
    pub retry: RetryConfig,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=3000
        let logging = LogConfig::from_env()?;
        let storage = env_or_default("STORAGE_BACKEND", "postgres")
            .parse()
            .map_err(|details| ConfigError::ParseError {
                key: "STORAGE_BACKEND".to_string(),
                details,
            })?;
        let database = PostgresConfig::from_env()?;
        let retry = RetryConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            environment,
            server,
            logging,
            storage,
            database,
            retry,
        })
    }
}
