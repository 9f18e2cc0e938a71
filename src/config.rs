//! Configuration parsing and validation.
//!
//! Configuration comes from an optional TOML file. Every section has
//! defaults, so the service runs with no file at all. Environment
//! variables are applied on top of the file:
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `DATABASE_URL` | `[db].url` |
//! | `NOTES_BIND` | `[server].bind` |
//!
//! # Example
//!
//! ```toml
//! [db]
//! url = "sqlite:./data/notes.sqlite"
//! max_connections = 5
//!
//! [server]
//! bind = "127.0.0.1:8000"
//!
//! [log]
//! filter = "info"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Local development database used when nothing else is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/notes.sqlite";

pub const DATABASE_URL_ENV: &str = "DATABASE_URL";
pub const BIND_ENV: &str = "NOTES_BIND";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub db: DbConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    /// Connection string, e.g. `sqlite:./data/notes.sqlite`.
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    DEFAULT_DATABASE_URL.to_string()
}
fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8000".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from `path` (or defaults), apply environment
    /// overrides, and validate.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let mut config = match path {
            Some(path) => parse_file(path)?,
            None => Config::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (normally the process environment).
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_ENV).filter(|v| !v.is_empty()) {
            self.db.url = url;
        }
        if let Some(bind) = lookup(BIND_ENV).filter(|v| !v.is_empty()) {
            self.server.bind = bind;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.db.url.trim().is_empty() {
            bail!("db.url must not be empty");
        }
        if !self.db.url.starts_with("sqlite:") {
            bail!(
                "Unsupported database URL: '{}'. Only sqlite: URLs are supported.",
                self.db.url
            );
        }
        if self.db.max_connections == 0 {
            bail!("db.max_connections must be >= 1");
        }
        if self.server.bind.trim().is_empty() {
            bail!("server.bind must not be empty");
        }
        Ok(())
    }
}

fn parse_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content).with_context(|| "Failed to parse config file")
}
