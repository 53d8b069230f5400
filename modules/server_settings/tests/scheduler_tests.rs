//! Interval scheduler tests on paused tokio time

mod common;

use anyhow::Result;
use async_trait::async_trait;
use common::MockSettingsRepo;
use parking_lot::RwLock;
use server_settings::contract::ServerSettingKey;
use server_settings::domain::TaskScheduler;
use server_settings::infra::{IntervalTaskScheduler, JobRunner, RecurringJob};
use std::sync::Arc;
use std::time::Duration;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Default)]
struct RecordingRunner {
    runs: RwLock<Vec<RecurringJob>>,
}

impl RecordingRunner {
    fn count(&self, job: RecurringJob) -> usize {
        self.runs.read().iter().filter(|j| **j == job).count()
    }
}

#[async_trait]
impl JobRunner for RecordingRunner {
    async fn run(&self, job: RecurringJob) -> Result<()> {
        self.runs.write().push(job);
        Ok(())
    }
}

fn scheduler(repo: MockSettingsRepo) -> (IntervalTaskScheduler, Arc<RecordingRunner>) {
    let runner = Arc::new(RecordingRunner::default());
    let scheduler = IntervalTaskScheduler::new(Arc::new(repo), runner.clone());
    (scheduler, runner)
}

async fn advance(duration: Duration) {
    tokio::time::advance(duration).await;
    // let spawned jobs observe the tick
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_jobs_follow_configured_frequencies() {
    let repo = MockSettingsRepo::with_defaults();
    repo.set(ServerSettingKey::TaskScan, "weekly");
    repo.set(ServerSettingKey::TaskBackup, "disabled");
    let (scheduler, runner) = scheduler(repo);

    scheduler.schedule_tasks().await.unwrap();
    assert_eq!(
        scheduler.scheduled(),
        vec![
            RecurringJob::ScanLibraries,
            RecurringJob::Cleanup,
            RecurringJob::ReportStats
        ]
    );

    advance(DAY + Duration::from_secs(1)).await;
    assert_eq!(runner.count(RecurringJob::Cleanup), 1);
    assert_eq!(runner.count(RecurringJob::ReportStats), 1);
    assert_eq!(runner.count(RecurringJob::ScanLibraries), 0);
    assert_eq!(runner.count(RecurringJob::Backup), 0);

    for _ in 0..6 {
        advance(DAY).await;
    }
    assert_eq!(runner.count(RecurringJob::ScanLibraries), 1);
    assert_eq!(runner.count(RecurringJob::Cleanup), 7);
}

#[tokio::test(start_paused = true)]
async fn test_stats_job_respects_opt_out() {
    let repo = MockSettingsRepo::with_defaults();
    repo.set(ServerSettingKey::AllowStatCollection, "false");
    let (scheduler, runner) = scheduler(repo);

    scheduler.schedule_tasks().await.unwrap();
    assert!(!scheduler.scheduled().contains(&RecurringJob::ReportStats));

    scheduler.schedule_stats_tasks().await.unwrap();
    assert!(scheduler.scheduled().contains(&RecurringJob::ReportStats));

    scheduler.cancel_stats_tasks();
    advance(DAY + Duration::from_secs(1)).await;
    assert_eq!(runner.count(RecurringJob::ReportStats), 0);
}

#[tokio::test(start_paused = true)]
async fn test_rescheduling_replaces_previous_jobs() {
    let (scheduler, runner) = scheduler(MockSettingsRepo::with_defaults());

    scheduler.schedule_tasks().await.unwrap();
    scheduler.schedule_tasks().await.unwrap();
    advance(DAY + Duration::from_secs(1)).await;

    assert_eq!(runner.count(RecurringJob::Cleanup), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_cancels_everything() {
    let (scheduler, runner) = scheduler(MockSettingsRepo::with_defaults());

    scheduler.schedule_tasks().await.unwrap();
    scheduler.shutdown();
    advance(DAY + Duration::from_secs(1)).await;

    assert!(scheduler.scheduled().is_empty());
    assert!(runner.runs.read().is_empty());
}
