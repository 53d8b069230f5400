//! Subsystems driven by settings changes
//!
//! Each trait is a seam to another part of the server. The reconciler only
//! ever calls them; their failures are logged and never undo a commit.
//! Implementations are in infra/.

use crate::contract::{EmailTestResult, LogLevel};
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Recurring background jobs
#[async_trait]
pub trait TaskScheduler: Send + Sync {
    /// Re-read task frequencies and (re)schedule every recurring job
    async fn schedule_tasks(&self) -> Result<()>;

    /// Schedule the anonymous usage statistics job
    async fn schedule_stats_tasks(&self) -> Result<()>;

    /// Cancel the anonymous usage statistics job
    fn cancel_stats_tasks(&self);
}

/// Filesystem watcher over the library folders
#[async_trait]
pub trait LibraryWatcher: Send + Sync {
    async fn start_watching(&self) -> Result<()>;

    fn stop_watching(&self);
}

/// Live log verbosity
pub trait LogLevelSwitch: Send + Sync {
    fn switch_level(&self, level: LogLevel) -> Result<()>;
}

/// Outbound email relay
#[async_trait]
pub trait EmailService: Send + Sync {
    /// Probe a relay endpoint
    async fn test_connectivity(
        &self,
        email_url: &str,
        admin_email: &str,
        is_default: bool,
    ) -> Result<EmailTestResult>;

    /// Point the relay client at a new endpoint, trusting its certificate
    fn configure_relay(&self, email_url: &str) -> Result<()>;
}

/// Filesystem operations used for the bookmark directory
pub trait DirectoryService: Send + Sync {
    /// Whether files can be created inside `path` (creating it if needed)
    fn check_write_access(&self, path: &Path) -> bool;

    fn exist_or_create(&self, path: &Path) -> Result<()>;

    /// Copy the contents of `from` into `to`, keeping relative layout
    fn copy_directory_to_directory(&self, from: &Path, to: &Path) -> Result<()>;

    fn clear_and_delete_directory(&self, path: &Path) -> Result<()>;

    /// Absolute form of `path` with normalized separators
    fn normalize(&self, path: &str) -> PathBuf;
}

/// Translation of message keys into the caller's language
pub trait Localizer: Send + Sync {
    fn translate(&self, user_id: Option<&str>, key: &str, args: &[String]) -> String;
}

/// Handles to every subsystem the settings service drives
#[derive(Clone)]
pub struct Collaborators {
    pub scheduler: Arc<dyn TaskScheduler>,
    pub watcher: Arc<dyn LibraryWatcher>,
    pub log_level: Arc<dyn LogLevelSwitch>,
    pub email: Arc<dyn EmailService>,
    pub directories: Arc<dyn DirectoryService>,
    pub localizer: Arc<dyn Localizer>,
}
