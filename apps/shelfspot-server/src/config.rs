//! Application configuration
//!
//! Loaded from a YAML file with `SHELFSPOT__` environment overrides, e.g.
//! `SHELFSPOT__SERVER__ADMIN_TOKEN=...`.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub modules: ModulesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Bind address used when the bind settings are owned by the container
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Bearer token granting admin rights; empty disables admin access
    #[serde(default)]
    pub admin_token: String,

    /// Email address reported for the admin caller
    #[serde(default)]
    pub admin_email: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            admin_token: String::new(),
            admin_email: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Emit JSON lines on the console instead of human readable output
    #[serde(default)]
    pub json: bool,

    /// File name prefix of the daily rolling log
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            file_prefix: default_file_prefix(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModulesConfig {
    #[serde(default)]
    pub server_settings: server_settings::Config,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        Figment::new()
            .merge(Yaml::file(path))
            .merge(Env::prefixed("SHELFSPOT__").split("__"))
            .extract()
            .with_context(|| format!("failed to load configuration from {}", path.display()))
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_database_url() -> String {
    "sqlite://config/shelfspot.db?mode=rwc".to_string()
}

fn default_file_prefix() -> String {
    "shelfspot.log".to_string()
}
