//! Shared mocks and harness for server settings tests
#![allow(dead_code)]

use anyhow::{bail, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use server_settings::contract::*;
use server_settings::domain::converter;
use server_settings::domain::{
    Collaborators, ConfigStore, DirectoryService, EmailService, LibraryWatcher, Localizer,
    LogLevelSwitch, Service, SettingsRepository, TaskScheduler,
};
use std::collections::{BTreeMap, HashSet};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub fn print_test_header(test_name: &str, purpose: &[&str]) {
    println!("\n🧪 TEST: {}", test_name);
    if let Some(first) = purpose.first() {
        println!("📋 PURPOSE: {}", first);
    }
    for line in purpose.iter().skip(1) {
        println!("   {}", line);
    }
}

// ===== Repository =====

#[derive(Default)]
pub struct MockSettingsRepo {
    rows: RwLock<BTreeMap<ServerSettingKey, String>>,
    saves: RwLock<Vec<Vec<ServerSetting>>>,
    fail_saves: AtomicBool,
}

impl MockSettingsRepo {
    pub fn with_defaults() -> Self {
        let repo = Self::default();
        {
            let mut rows = repo.rows.write();
            for row in converter::default_rows("test-install-id") {
                rows.insert(row.key, row.value);
            }
        }
        repo
    }

    pub fn value(&self, key: ServerSettingKey) -> Option<String> {
        self.rows.read().get(&key).cloned()
    }

    pub fn set(&self, key: ServerSettingKey, value: &str) {
        self.rows.write().insert(key, value.to_string());
    }

    pub fn rows(&self) -> Vec<ServerSetting> {
        self.rows
            .read()
            .iter()
            .map(|(k, v)| ServerSetting::new(*k, v.clone()))
            .collect()
    }

    /// Keys written by each committed save, in order
    pub fn saved_keys(&self) -> Vec<Vec<ServerSettingKey>> {
        self.saves
            .read()
            .iter()
            .map(|batch| batch.iter().map(|s| s.key).collect())
            .collect()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn print_state(&self, context: &str) {
        println!("\n========== Settings Table: {} ==========", context);
        for (key, value) in self.rows.read().iter() {
            println!("  {:<22} = {}", key, value);
        }
        println!("==========================================\n");
    }
}

#[async_trait]
impl SettingsRepository for MockSettingsRepo {
    async fn find_all(&self) -> Result<Vec<ServerSetting>> {
        Ok(self.rows())
    }

    async fn find_by_key(&self, key: ServerSettingKey) -> Result<Option<ServerSetting>> {
        Ok(self.value(key).map(|v| ServerSetting::new(key, v)))
    }

    async fn save_all(&self, settings: &[ServerSetting]) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            bail!("database is locked");
        }
        let mut rows = self.rows.write();
        if let Some(missing) = settings.iter().find(|s| !rows.contains_key(&s.key)) {
            bail!("no row for setting {}", missing.key);
        }
        for setting in settings {
            rows.insert(setting.key, setting.value.clone());
        }
        self.saves.write().push(settings.to_vec());
        Ok(())
    }

    async fn insert_missing(&self, settings: &[ServerSetting]) -> Result<usize> {
        let mut rows = self.rows.write();
        let mut inserted = 0;
        for setting in settings {
            if !rows.contains_key(&setting.key) {
                rows.insert(setting.key, setting.value.clone());
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

// ===== Recording collaborators =====

#[derive(Default)]
pub struct RecordingScheduler {
    pub reschedules: AtomicUsize,
    pub stats_scheduled: AtomicUsize,
    pub stats_cancelled: AtomicUsize,
}

#[async_trait]
impl TaskScheduler for RecordingScheduler {
    async fn schedule_tasks(&self) -> Result<()> {
        self.reschedules.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn schedule_stats_tasks(&self) -> Result<()> {
        self.stats_scheduled.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn cancel_stats_tasks(&self) {
        self.stats_cancelled.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingWatcher {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
}

#[async_trait]
impl LibraryWatcher for RecordingWatcher {
    async fn start_watching(&self) -> Result<()> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn stop_watching(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingLogSwitch {
    pub levels: RwLock<Vec<LogLevel>>,
}

impl LogLevelSwitch for RecordingLogSwitch {
    fn switch_level(&self, level: LogLevel) -> Result<()> {
        self.levels.write().push(level);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEmail {
    pub relays: RwLock<Vec<String>>,
    pub probes: RwLock<Vec<(String, String, bool)>>,
}

#[async_trait]
impl EmailService for RecordingEmail {
    async fn test_connectivity(
        &self,
        email_url: &str,
        admin_email: &str,
        is_default: bool,
    ) -> Result<EmailTestResult> {
        self.probes
            .write()
            .push((email_url.to_string(), admin_email.to_string(), is_default));
        Ok(EmailTestResult {
            successful: true,
            error_message: None,
        })
    }

    fn configure_relay(&self, email_url: &str) -> Result<()> {
        self.relays.write().push(email_url.to_string());
        Ok(())
    }
}

/// In-memory directory service rooted at `/srv/shelfspot`
#[derive(Default)]
pub struct FakeDirectories {
    pub unwritable: RwLock<HashSet<PathBuf>>,
    pub ops: RwLock<Vec<String>>,
    pub fail_copy: AtomicBool,
}

impl FakeDirectories {
    pub fn ops(&self) -> Vec<String> {
        self.ops.read().clone()
    }
}

impl DirectoryService for FakeDirectories {
    fn check_write_access(&self, path: &Path) -> bool {
        !self.unwritable.read().contains(path)
    }

    fn exist_or_create(&self, path: &Path) -> Result<()> {
        self.ops.write().push(format!("create {}", path.display()));
        Ok(())
    }

    fn copy_directory_to_directory(&self, from: &Path, to: &Path) -> Result<()> {
        if self.fail_copy.load(Ordering::SeqCst) {
            bail!("disk full");
        }
        self.ops
            .write()
            .push(format!("copy {} -> {}", from.display(), to.display()));
        Ok(())
    }

    fn clear_and_delete_directory(&self, path: &Path) -> Result<()> {
        self.ops.write().push(format!("delete {}", path.display()));
        Ok(())
    }

    fn normalize(&self, path: &str) -> PathBuf {
        let joined = Path::new("/srv/shelfspot").join(path.trim());
        let mut normalized = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    normalized.pop();
                }
                other => normalized.push(other),
            }
        }
        normalized
    }
}

/// Renders `key[arg,arg]` so tests can assert on what was translated
pub struct KeyLocalizer;

impl Localizer for KeyLocalizer {
    fn translate(&self, _user_id: Option<&str>, key: &str, args: &[String]) -> String {
        format!("{}[{}]", key, args.join(","))
    }
}

// ===== Harness =====

pub struct Harness {
    pub service: Arc<Service>,
    pub repo: Arc<MockSettingsRepo>,
    pub store: Arc<ConfigStore>,
    pub scheduler: Arc<RecordingScheduler>,
    pub watcher: Arc<RecordingWatcher>,
    pub log_level: Arc<RecordingLogSwitch>,
    pub email: Arc<RecordingEmail>,
    pub directories: Arc<FakeDirectories>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(MockSettingsRepo::with_defaults(), false)
    }

    pub fn containerized() -> Self {
        Self::build(MockSettingsRepo::with_defaults(), true)
    }

    pub fn empty() -> Self {
        Self::build(MockSettingsRepo::default(), false)
    }

    fn build(repo: MockSettingsRepo, containerized: bool) -> Self {
        let repo = Arc::new(repo);
        let store = Arc::new(ConfigStore::from_settings(&repo.rows()));
        let scheduler = Arc::new(RecordingScheduler::default());
        let watcher = Arc::new(RecordingWatcher::default());
        let log_level = Arc::new(RecordingLogSwitch::default());
        let email = Arc::new(RecordingEmail::default());
        let directories = Arc::new(FakeDirectories::default());

        let collaborators = Collaborators {
            scheduler: scheduler.clone(),
            watcher: watcher.clone(),
            log_level: log_level.clone(),
            email: email.clone(),
            directories: directories.clone(),
            localizer: Arc::new(KeyLocalizer),
        };
        let service = Arc::new(Service::new(
            repo.clone(),
            collaborators,
            store.clone(),
            containerized,
        ));

        Self {
            service,
            repo,
            store,
            scheduler,
            watcher,
            log_level,
            email,
            directories,
        }
    }

    pub async fn snapshot(&self) -> ServerSettings {
        self.service.get_settings().await.unwrap()
    }

    pub fn reschedules(&self) -> usize {
        self.scheduler.reschedules.load(Ordering::SeqCst)
    }
}

pub fn admin() -> AuthContext {
    AuthContext::admin(Some("admin".into()), Some("admin@example.com".into()))
}
