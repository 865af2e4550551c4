use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse};

/// Startup connection policy: a fixed number of retries, a constant pause between them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Pause between attempts in milliseconds
    pub delay_ms: u64,
}

impl RetryConfig {
    pub fn fixed(max_retries: u32, delay_ms: u64) -> Self {
        Self {
            max_retries,
            delay_ms,
        }
    }

    /// Total attempts this policy allows, counting the first one
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Startup connection policy from the environment:
/// - `DB_CONNECT_RETRIES` (default: 5)
/// - `DB_CONNECT_RETRY_DELAY_MS` (default: 2000)
#[cfg(feature = "config")]
impl FromEnv for RetryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let max_retries = env_parse("DB_CONNECT_RETRIES", "5")?;
        let delay_ms = env_parse("DB_CONNECT_RETRY_DELAY_MS", "2000")?;
        Ok(Self::fixed(max_retries, delay_ms))
    }
}

/// Run `operation` until it succeeds or `config` runs out of attempts.
///
/// Each failure is logged at warn; the last error is returned as-is.
pub async fn retry_with_delay<F, Fut, T, E>(mut operation: F, config: &RetryConfig) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = config.max_attempts();
    let mut attempt = 1;

    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(attempt, "Operation succeeded after retrying");
                }
                return Ok(result);
            }
            Err(e) if attempt >= max_attempts => {
                warn!(attempts = attempt, error = %e, "Operation failed, giving up");
                return Err(e);
            }
            Err(e) => {
                warn!(
                    attempt,
                    max_attempts,
                    retry_in_ms = config.delay_ms,
                    error = %e,
                    "Operation failed, retrying"
                );
                tokio::time::sleep(config.delay()).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_first_success_is_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result = retry_with_delay(
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>("connected")
            },
            &RetryConfig::fixed(3, 10),
        )
        .await;

        assert_eq!(result.unwrap(), "connected");
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_succeeds_after_failures() {
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result = retry_with_delay(
            move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(format!("connection refused ({})", n + 1))
                } else {
                    Ok("connected")
                }
            },
            &RetryConfig::fixed(5, 10),
        )
        .await;

        assert_eq!(result.unwrap(), "connected");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_returns_last_error_when_attempts_run_out() {
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result = retry_with_delay(
            move || async move {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(format!("failure {}", n + 1))
            },
            &RetryConfig::fixed(2, 10),
        )
        .await;

        assert_eq!(result.unwrap_err(), "failure 3");
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_retries_means_single_attempt() {
        let counter = AtomicU32::new(0);
        let calls = &counter;

        let result = retry_with_delay(
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>("down")
            },
            &RetryConfig::fixed(0, 1000),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_waits_between_attempts() {
        let start = std::time::Instant::now();

        let _ = retry_with_delay(|| async { Err::<(), _>("down") }, &RetryConfig::fixed(3, 40)).await;

        assert!(start.elapsed() >= Duration::from_millis(120));
    }

    #[cfg(feature = "config")]
    #[test]
    fn test_retry_config_from_env() {
        temp_env::with_vars(
            [
                ("DB_CONNECT_RETRIES", None::<&str>),
                ("DB_CONNECT_RETRY_DELAY_MS", None::<&str>),
            ],
            || {
                let config = RetryConfig::from_env().unwrap();
                assert_eq!(config, RetryConfig::fixed(5, 2000));
                assert_eq!(config.max_attempts(), 6);
            },
        );

        temp_env::with_var("DB_CONNECT_RETRIES", Some("many"), || {
            let err = RetryConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("DB_CONNECT_RETRIES"));
        });
    }
}
