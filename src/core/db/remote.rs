/// Remote Connection Module
///
/// Credentials for a client/server database and a wrapper that will own a
/// connection to it. No driver is wired in yet, so connecting always fails
/// with `Unsupported`. Statements for it can already be rendered with the
/// `%s` placeholder.

use crate::core::{Result, SqlscribeError};
use std::fmt;
use tracing::warn;

/// Port used when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 5432;

/// Connection parameters for a client/server database.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub database: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

impl RemoteConfig {
    /// Reads `DATABASE`, `USER`, `PASSWORD`, `HOST` and `PORT` from the
    /// process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, such as a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| {
                SqlscribeError::Config(format!("missing environment variable {}", key))
            })
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                SqlscribeError::Config(format!("PORT must be a port number, got '{}'", raw))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(RemoteConfig {
            database: required("DATABASE")?,
            user: required("USER")?,
            password: required("PASSWORD")?,
            host: required("HOST")?,
            port,
        })
    }
}

/// Wrapper for a client/server database connection. No value of it can be
/// built until a driver is wired in.
#[derive(Debug)]
#[non_exhaustive]
pub struct RemoteConnection {}

impl RemoteConnection {
    /// Always fails: no client/server driver is available.
    pub fn connect(config: RemoteConfig) -> Result<Self> {
        warn!(
            "Remote connection to {}:{}/{} requested but not supported",
            config.host, config.port, config.database
        );
        Err(SqlscribeError::Unsupported(
            "remote database connections are not implemented".to_string(),
        ))
    }
}
