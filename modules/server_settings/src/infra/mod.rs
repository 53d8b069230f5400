//! Infrastructure layer - storage and the subsystems settings changes drive

pub mod email;
pub mod fs;
pub mod jobs;
pub mod locale;
pub mod scheduler;
pub mod storage;
pub mod watcher;

pub use email::HttpEmailService;
pub use fs::LocalDirectoryService;
pub use jobs::MaintenanceJobs;
pub use locale::JsonLocalizer;
pub use scheduler::{IntervalTaskScheduler, JobRunner, RecurringJob};
pub use watcher::NotifyLibraryWatcher;
