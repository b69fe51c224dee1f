use crate::ProbeError;
use secrecy::SecretString;
use std::time::Duration;

/// Connection and retry settings, read from the environment with
/// docker-compose-friendly defaults.
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: SecretString,
    pub max_retries: u32,
    pub retry_interval: Duration,
    /// Optional application endpoint to wait for once the database is up.
    pub http_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ProbeError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests and keeps
    /// `from_env()` small and safe.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, ProbeError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let host = get("DB_HOST").unwrap_or_else(|| "postgres".into());
        let port = match get("DB_PORT") {
            Some(v) => v
                .parse::<u16>()
                .map_err(|_| ProbeError::Config(format!("DB_PORT must be a port number, got {v:?}")))?,
            None => 5432,
        };
        let database = get("DB_NAME").unwrap_or_else(|| "dbt_test".into());
        let user = get("DB_USER").unwrap_or_else(|| "dbt_user".into());
        let password = get("DB_PASSWORD").unwrap_or_else(|| "dbt_password".into());

        let max_retries = match get("MAX_RETRIES") {
            Some(v) => v.parse::<u32>().ok().filter(|n| *n >= 1).ok_or_else(|| {
                ProbeError::Config(format!("MAX_RETRIES must be a positive integer, got {v:?}"))
            })?,
            None => 30,
        };
        let retry_interval = match get("RETRY_INTERVAL_SECONDS") {
            Some(v) => {
                let secs = v.parse::<f64>().ok().filter(|s| s.is_finite() && *s > 0.0);
                let secs = secs.ok_or_else(|| {
                    ProbeError::Config(format!(
                        "RETRY_INTERVAL_SECONDS must be a positive number, got {v:?}"
                    ))
                })?;
                Duration::from_secs_f64(secs)
            }
            None => Duration::from_secs(2),
        };

        Ok(Self {
            host,
            port,
            database,
            user,
            password: SecretString::new(password.into()),
            max_retries,
            retry_interval,
            http_url: get("WAIT_HTTP_URL"),
        })
    }
}
