use crate::core::{Result, SqlscribeError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub sqlite: Option<SqliteConfig>,
}

/// Settings applied to every SQLite connection when it is opened.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SqliteConfig {
    /// Turns `PRAGMA foreign_keys` on or off; the engine default when unset.
    pub foreign_keys: Option<bool>,
    /// How long to wait on a locked database before failing.
    pub busy_timeout_ms: Option<u64>,
}

impl Config {
    pub fn sqlite(&self) -> SqliteConfig {
        self.sqlite.clone().unwrap_or_default()
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Example
///
/// ```no_run
/// let config = sqlscribe::config::load_config("sqlscribe.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration from TOML text.
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| SqlscribeError::Config(e.to_string()))
}
