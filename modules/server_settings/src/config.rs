//! Configuration for server settings module

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Server settings module configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Port and bind addresses are owned by the container environment
    #[serde(default = "detect_containerized")]
    pub containerized: bool,

    /// Library folders observed while folder watching is enabled
    #[serde(default)]
    pub library_roots: Vec<PathBuf>,

    /// Directory the server writes its rolling log files to
    #[serde(default = "default_log_directory")]
    pub log_directory: PathBuf,

    /// Timeout for email relay requests
    #[serde(default = "default_email_timeout", with = "humantime_serde")]
    pub email_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            containerized: detect_containerized(),
            library_roots: Vec::new(),
            log_directory: default_log_directory(),
            email_timeout: default_email_timeout(),
        }
    }
}

fn detect_containerized() -> bool {
    Path::new("/.dockerenv").exists()
        || std::env::var("SHELFSPOT_CONTAINERIZED").is_ok_and(|v| v == "1" || v == "true")
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("config/logs")
}

fn default_email_timeout() -> Duration {
    Duration::from_secs(30)
}
