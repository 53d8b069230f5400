//! Interval-based recurring task scheduler
//!
//! Every recurring job runs on its own tokio task and is cancelled through a
//! [`CancellationToken`] when rescheduled or disabled.

use crate::contract::{ServerSettingKey, TaskFrequency};
use crate::domain::converter;
use crate::domain::{SettingsRepository, TaskScheduler};
use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Period of the anonymous statistics report
pub const STATS_PERIOD: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecurringJob {
    ScanLibraries,
    Backup,
    Cleanup,
    ReportStats,
}

impl fmt::Display for RecurringJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ScanLibraries => "scan-libraries",
            Self::Backup => "backup",
            Self::Cleanup => "cleanup",
            Self::ReportStats => "report-stats",
        };
        f.write_str(name)
    }
}

/// Executes one run of a recurring job
#[async_trait]
pub trait JobRunner: Send + Sync {
    async fn run(&self, job: RecurringJob) -> Result<()>;
}

pub struct IntervalTaskScheduler {
    repo: Arc<dyn SettingsRepository>,
    runner: Arc<dyn JobRunner>,
    jobs: Mutex<HashMap<RecurringJob, CancellationToken>>,
}

impl IntervalTaskScheduler {
    pub fn new(repo: Arc<dyn SettingsRepository>, runner: Arc<dyn JobRunner>) -> Self {
        Self {
            repo,
            runner,
            jobs: Mutex::new(HashMap::new()),
        }
    }

    /// Jobs currently scheduled, sorted
    pub fn scheduled(&self) -> Vec<RecurringJob> {
        let mut jobs: Vec<_> = self.jobs.lock().keys().copied().collect();
        jobs.sort();
        jobs
    }

    /// Cancel every job
    pub fn shutdown(&self) {
        for (job, token) in self.jobs.lock().drain() {
            debug!(%job, "Cancelling recurring job");
            token.cancel();
        }
    }

    fn cancel(&self, job: RecurringJob) {
        if let Some(token) = self.jobs.lock().remove(&job) {
            token.cancel();
        }
    }

    fn schedule(&self, job: RecurringJob, period: Duration) {
        let token = CancellationToken::new();
        if let Some(previous) = self.jobs.lock().insert(job, token.clone()) {
            previous.cancel();
        }

        let runner = self.runner.clone();
        let start = Instant::now() + period;
        tokio::spawn(async move {
            let mut ticker = interval_at(start, period);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        debug!(%job, "Running recurring job");
                        if let Err(e) = runner.run(job).await {
                            warn!(%job, error = %e, "Recurring job failed");
                        }
                    }
                }
            }
        });
        debug!(%job, ?period, "Scheduled recurring job");
    }

    async fn frequency(&self, key: ServerSettingKey) -> Result<TaskFrequency> {
        let frequency = match self.repo.find_by_key(key).await? {
            Some(setting) => setting.value.parse().map_err(anyhow::Error::msg)?,
            None => TaskFrequency::Daily,
        };
        Ok(frequency)
    }

    async fn stats_allowed(&self) -> Result<bool> {
        match self
            .repo
            .find_by_key(ServerSettingKey::AllowStatCollection)
            .await?
        {
            Some(setting) => Ok(converter::parse_bool(&setting)?),
            None => Ok(true),
        }
    }
}

#[async_trait]
impl TaskScheduler for IntervalTaskScheduler {
    async fn schedule_tasks(&self) -> Result<()> {
        for (job, key) in [
            (RecurringJob::ScanLibraries, ServerSettingKey::TaskScan),
            (RecurringJob::Backup, ServerSettingKey::TaskBackup),
            (RecurringJob::Cleanup, ServerSettingKey::TaskCleanup),
        ] {
            match self.frequency(key).await?.period() {
                Some(period) => self.schedule(job, period),
                None => {
                    debug!(%job, "Recurring job disabled");
                    self.cancel(job);
                }
            }
        }

        if self.stats_allowed().await? {
            self.schedule_stats_tasks().await?;
        } else {
            self.cancel_stats_tasks();
        }

        info!(jobs = ?self.scheduled(), "Recurring tasks scheduled");
        Ok(())
    }

    async fn schedule_stats_tasks(&self) -> Result<()> {
        self.schedule(RecurringJob::ReportStats, STATS_PERIOD);
        Ok(())
    }

    fn cancel_stats_tasks(&self) {
        debug!("Cancelling stats collection");
        self.cancel(RecurringJob::ReportStats);
    }
}

impl Drop for IntervalTaskScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}
