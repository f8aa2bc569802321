//! Store configuration read from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | `postgres://localhost/geonotes` |
//! | `DB_MAX_CONNECTIONS` | 10 |
//! | `NOTE_QUERY_TIMEOUT_MS` | 3000 |

use std::str::FromStr;
use std::time::Duration;

use geonote_core::defaults::{DATABASE_URL, QUERY_TIMEOUT_SECS};
use geonote_core::{Error, Result};

use crate::pool::PoolConfig;

/// Connection and deadline settings for a [`Database`](crate::Database).
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool: PoolConfig,
    /// Deadline applied to each store call.
    pub query_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DATABASE_URL.to_string(),
            pool: PoolConfig::default(),
            query_timeout: Duration::from_secs(QUERY_TIMEOUT_SECS),
        }
    }
}

impl DatabaseConfig {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, falling back to defaults for unset keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()) {
            config.url = url;
        }
        if let Some(n) = parse_var::<u32, _>(&lookup, "DB_MAX_CONNECTIONS")? {
            if n == 0 {
                return Err(Error::Config(
                    "DB_MAX_CONNECTIONS must be at least 1".to_string(),
                ));
            }
            config.pool = config.pool.max_connections(n);
        }
        if let Some(ms) = parse_var::<u64, _>(&lookup, "NOTE_QUERY_TIMEOUT_MS")? {
            if ms == 0 {
                return Err(Error::Config(
                    "NOTE_QUERY_TIMEOUT_MS must be at least 1".to_string(),
                ));
            }
            config.query_timeout = Duration::from_millis(ms);
        }

        Ok(config)
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} must be a number, got {:?}", key, raw))),
    }
}
