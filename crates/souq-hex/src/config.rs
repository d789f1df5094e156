use std::env;
use std::time::Duration;

use crate::errors::BootstrapError;

pub const DEFAULT_WORKERS: u16 = 4;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Only the launcher needs it; `--init-only` runs without a port.
    pub port: Option<u16>,
    pub workers: u16,
    pub app_server: String,
    pub app_module: String,
    pub probe_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, BootstrapError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BootstrapError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").ok_or_else(|| {
            BootstrapError::Config("DATABASE_URL environment variable is not set".into())
        })?;

        let port = var("PORT")
            .map(|raw| {
                raw.trim()
                    .parse::<u16>()
                    .map_err(|e| BootstrapError::Config(format!("PORT `{raw}` is not a valid port: {e}")))
            })
            .transpose()?;

        let workers = match var("WEB_CONCURRENCY") {
            Some(raw) => match raw.trim().parse::<u16>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(BootstrapError::Config(format!(
                        "WEB_CONCURRENCY `{raw}` must be a positive integer"
                    )))
                }
            },
            None => DEFAULT_WORKERS,
        };

        let probe_timeout = match var("DB_PROBE_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(BootstrapError::Config(format!(
                        "DB_PROBE_TIMEOUT_SECS `{raw}` must be a positive number of seconds"
                    )))
                }
            },
            None => DEFAULT_PROBE_TIMEOUT,
        };

        Ok(Self {
            database_url,
            port,
            workers,
            app_server: var("APP_SERVER").unwrap_or_else(|| "gunicorn".into()),
            app_module: var("APP_MODULE").unwrap_or_else(|| "src.main:app".into()),
            probe_timeout,
        })
    }

    pub fn require_port(&self) -> Result<u16, BootstrapError> {
        self.port.ok_or_else(|| {
            BootstrapError::Config("PORT environment variable is not set".into())
        })
    }
}
