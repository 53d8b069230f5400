//! Built-in recurring job runner

use super::scheduler::{JobRunner, RecurringJob};
use crate::domain::converter;
use crate::domain::{DirectoryService, SettingsRepository};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info};

/// Runs the maintenance jobs owned by the settings module. Cleanup prunes
/// backups and logs down to the configured retention; the other jobs belong
/// to subsystems outside this module and are only logged.
pub struct MaintenanceJobs {
    repo: Arc<dyn SettingsRepository>,
    directories: Arc<dyn DirectoryService>,
    log_directory: PathBuf,
}

impl MaintenanceJobs {
    pub fn new(
        repo: Arc<dyn SettingsRepository>,
        directories: Arc<dyn DirectoryService>,
        log_directory: PathBuf,
    ) -> Self {
        Self {
            repo,
            directories,
            log_directory,
        }
    }

    async fn cleanup(&self) -> Result<()> {
        let rows = self.repo.find_all().await?;
        let settings = converter::to_settings(&rows)?;

        let backups = self.directories.normalize(&settings.backup_directory);
        let removed_backups = prune_oldest(&backups, settings.total_backups)?;
        let removed_logs = prune_oldest(&self.log_directory, settings.total_logs)?;

        info!(removed_backups, removed_logs, "Cleanup finished");
        Ok(())
    }
}

#[async_trait]
impl JobRunner for MaintenanceJobs {
    async fn run(&self, job: RecurringJob) -> Result<()> {
        match job {
            RecurringJob::Cleanup => self.cleanup().await,
            other => {
                debug!(job = %other, "No maintenance work for job");
                Ok(())
            }
        }
    }
}

/// Delete the oldest files in `dir` so at most `keep` remain
pub fn prune_oldest(dir: &Path, keep: i32) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let entry = entry?;
        let metadata = entry.metadata()?;
        if metadata.is_file() {
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((modified, entry.path()));
        }
    }

    files.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));

    let keep = usize::try_from(keep.max(0)).unwrap_or(0);
    let mut removed = 0;
    for (_, path) in files.into_iter().skip(keep) {
        fs::remove_file(&path).with_context(|| format!("failed to delete {}", path.display()))?;
        removed += 1;
    }
    Ok(removed)
}
