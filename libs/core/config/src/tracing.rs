use crate::{env_or_default, ConfigError, Environment, FromEnv};
use std::str::FromStr;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Output format of the log sink
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event, for log aggregation
    Json,
    /// Human-readable multi-line output
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "console" | "text" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format '{}', expected json or pretty", other)),
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,
    pub format: LogFormat,
}

impl LogConfig {
    /// Production-style defaults for the given environment
    pub fn for_environment(environment: &Environment) -> Self {
        Self {
            level: "info".to_string(),
            format: if environment.is_production() {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            },
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl FromEnv for LogConfig {
    /// - LOG_LEVEL: filter directive, defaults to "info"
    /// - LOG_FORMAT: "json" or "pretty" ("console" accepted), defaults to
    ///   json when APP_ENV=production and pretty otherwise
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::for_environment(&Environment::from_env());
        let level = env_or_default("LOG_LEVEL", &defaults.level);
        let format = match std::env::var("LOG_FORMAT") {
            Ok(raw) => raw.parse().map_err(|details| ConfigError::ParseError {
                key: "LOG_FORMAT".to_string(),
                details,
            })?,
            Err(_) => defaults.format,
        };

        Ok(Self { level, format })
    }
}

/// Install color-eyre with a project-standard configuration.
///
/// Call this early in main() before any fallible operations. Safe to call
/// multiple times.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize tracing with the configured sink and error span capture.
///
/// - [`LogFormat::Json`]: flattened JSON events without module targets
/// - [`LogFormat::Pretty`]: pretty-printed, human-readable events
///
/// Both sinks include `tracing_error::ErrorLayer` so eyre reports carry span
/// traces. `RUST_LOG` overrides `LOG_LEVEL` when set.
///
/// Calling this more than once is harmless; later calls are ignored
/// (common in tests).
pub fn init_tracing(config: &LogConfig) {
    let filter = config.filter();

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init(),
    };

    match result {
        Ok(_) => info!(level = %config.level, format = ?config.format, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}
