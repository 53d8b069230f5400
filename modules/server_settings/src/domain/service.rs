//! Domain service - settings reconciliation and its side effects

use super::collaborators::Collaborators;
use super::converter;
use super::reconciler::{self, BookmarkMigration, ReconcileContext, SettingsPlan, SideEffect};
use super::repository::SettingsRepository;
use super::runtime_config::ConfigStore;
use crate::contract::{
    AuthContext, EmailTestResult, LibraryType, LogLevel, ServerSetting, ServerSettingKey,
    ServerSettings, SettingsError, TaskFrequency, DEFAULT_BASE_URL, DEFAULT_EMAIL_SERVICE_URL,
    DEFAULT_IP_ADDRESSES,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Domain service for the server settings table
pub struct Service {
    repo: Arc<dyn SettingsRepository>,
    collaborators: Collaborators,
    config_store: Arc<ConfigStore>,
    containerized: bool,
    /// Serializes every write so concurrent requests cannot interleave
    /// plan and commit
    write_lock: Mutex<()>,
}

impl Service {
    /// Create a new service instance
    pub fn new(
        repo: Arc<dyn SettingsRepository>,
        collaborators: Collaborators,
        config_store: Arc<ConfigStore>,
        containerized: bool,
    ) -> Self {
        Self {
            repo,
            collaborators,
            config_store,
            containerized,
            write_lock: Mutex::new(()),
        }
    }

    pub fn config_store(&self) -> Arc<ConfigStore> {
        self.config_store.clone()
    }

    // ===== Read Operations =====

    /// Current base URL
    pub async fn get_base_url(&self) -> Result<String, SettingsError> {
        Ok(self.find_required(ServerSettingKey::BaseUrl).await?.value)
    }

    /// Whether the OPDS feed is enabled
    pub async fn is_opds_enabled(&self) -> Result<bool, SettingsError> {
        let setting = self.find_required(ServerSettingKey::EnableOpds).await?;
        converter::parse_bool(&setting)
    }

    /// Typed snapshot of the whole table. The log level is the one in
    /// effect, taken from the runtime config.
    pub async fn get_settings(&self) -> Result<ServerSettings, SettingsError> {
        let rows = self.load_all().await?;
        let mut settings = converter::to_settings(&rows)?;
        settings.logging_level = self.config_store.snapshot().log_level;
        Ok(settings)
    }

    /// Admin gate shared by every administrative operation
    pub fn authorize(auth: &AuthContext) -> Result<(), SettingsError> {
        if auth.is_admin {
            Ok(())
        } else {
            Err(SettingsError::Forbidden)
        }
    }

    pub fn task_frequencies() -> &'static [TaskFrequency] {
        &TaskFrequency::ALL
    }

    pub fn library_types() -> &'static [LibraryType] {
        &LibraryType::ALL
    }

    pub fn log_levels() -> &'static [LogLevel] {
        &LogLevel::ALL
    }

    // ===== Write Operations =====

    /// Insert default rows for missing keys and record the running version
    pub async fn seed_defaults(&self) -> Result<usize, SettingsError> {
        let _guard = self.write_lock.lock().await;

        let install_id = uuid::Uuid::new_v4().to_string();
        let inserted = self
            .repo
            .insert_missing(&converter::default_rows(&install_id))
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to seed server settings");
                SettingsError::Persistence
            })?;

        let version = ServerSetting::new(
            ServerSettingKey::InstallVersion,
            converter::INSTALL_VERSION,
        );
        let stored = self.find_required(ServerSettingKey::InstallVersion).await?;
        if stored.value != version.value {
            info!(from = %stored.value, to = %version.value, "Recording new install version");
            self.commit(std::slice::from_ref(&version)).await?;
        }

        let rows = self.load_all().await?;
        self.config_store.apply_all(&rows);

        if inserted > 0 {
            info!(inserted, "Seeded default server settings");
        }
        Ok(inserted)
    }

    /// Reconcile the table against a desired state.
    ///
    /// Validation failures leave the table, the runtime config and every
    /// subsystem untouched. Accepted toggles fire before commit; the
    /// bookmark move and task rescheduling run after it.
    pub async fn update_settings(
        &self,
        desired: ServerSettings,
        auth: &AuthContext,
    ) -> Result<ServerSettings, SettingsError> {
        Self::authorize(auth)?;
        let _guard = self.write_lock.lock().await;

        let current = self.load_all().await?;
        let ctx = ReconcileContext {
            containerized: self.containerized,
            directories: self.collaborators.directories.as_ref(),
        };
        let plan = reconciler::plan(&current, &desired, &ctx).inspect_err(|e| {
            info!(user = ?auth.user_id, error = %e, "Rejected server settings update");
        })?;

        if !plan.is_empty() {
            self.apply(plan).await?;
            info!(user = ?auth.user_id, "Server settings updated");
        } else {
            debug!("Server settings unchanged");
        }
        self.get_settings().await
    }

    /// Restore every setting to its default through reconciliation
    pub async fn reset_settings(
        &self,
        auth: &AuthContext,
    ) -> Result<ServerSettings, SettingsError> {
        Self::authorize(auth)?;
        info!(user = ?auth.user_id, "Resetting server settings");
        self.update_settings(converter::default_settings(), auth)
            .await
    }

    pub async fn reset_ip_addresses(
        &self,
        auth: &AuthContext,
    ) -> Result<ServerSettings, SettingsError> {
        self.reset_single(ServerSettingKey::IpAddresses, DEFAULT_IP_ADDRESSES, auth)
            .await
    }

    pub async fn reset_base_url(
        &self,
        auth: &AuthContext,
    ) -> Result<ServerSettings, SettingsError> {
        self.reset_single(ServerSettingKey::BaseUrl, DEFAULT_BASE_URL, auth)
            .await
    }

    pub async fn reset_email_url(
        &self,
        auth: &AuthContext,
    ) -> Result<ServerSettings, SettingsError> {
        let settings = self
            .reset_single(
                ServerSettingKey::EmailServiceUrl,
                DEFAULT_EMAIL_SERVICE_URL,
                auth,
            )
            .await?;
        self.fire(&SideEffect::EmailRelay(DEFAULT_EMAIL_SERVICE_URL.to_string()))
            .await;
        Ok(settings)
    }

    /// Probe an email relay on behalf of the caller
    pub async fn test_email_url(
        &self,
        url: &str,
        auth: &AuthContext,
    ) -> Result<EmailTestResult, SettingsError> {
        Self::authorize(auth)?;
        let url = reconciler::normalize_email_url(url);
        let admin_email = auth.email.clone().unwrap_or_default();
        let is_default = url == DEFAULT_EMAIL_SERVICE_URL;

        self.collaborators
            .email
            .test_connectivity(&url, &admin_email, is_default)
            .await
            .map_err(|e| {
                error!(error = %e, %url, "Email relay test failed");
                SettingsError::Internal
            })
    }

    // ===== Lifecycle =====

    /// Bring subsystems in line with the stored settings at startup
    pub async fn start_background(&self) -> Result<(), SettingsError> {
        let settings = self.get_settings().await?;

        self.fire(&SideEffect::LogLevel(settings.logging_level)).await;
        self.fire(&SideEffect::EmailRelay(settings.email_service_url))
            .await;
        if settings.enable_folder_watching {
            self.fire(&SideEffect::FolderWatching(true)).await;
        }
        self.reschedule().await;
        Ok(())
    }

    pub fn shutdown(&self) {
        self.collaborators.watcher.stop_watching();
    }

    /// User-facing message for an error, in the caller's language
    pub fn localize(&self, error: &SettingsError, auth: &AuthContext) -> String {
        self.collaborators.localizer.translate(
            auth.user_id.as_deref(),
            error.message_key(),
            &error.message_args(),
        )
    }

    // ===== Helper Methods =====

    async fn apply(&self, plan: SettingsPlan) -> Result<(), SettingsError> {
        for effect in &plan.effects {
            self.fire(effect).await;
        }

        self.commit(&plan.changes).await?;

        if let Some(migration) = &plan.bookmark_migration {
            self.migrate_bookmarks(migration);
        }
        self.reschedule().await;
        Ok(())
    }

    async fn reset_single(
        &self,
        key: ServerSettingKey,
        default: &str,
        auth: &AuthContext,
    ) -> Result<ServerSettings, SettingsError> {
        Self::authorize(auth)?;
        {
            let _guard = self.write_lock.lock().await;
            let mut setting = self.find_required(key).await?;
            if setting.value != default {
                info!(user = ?auth.user_id, %key, "Resetting server setting");
                setting.value = default.to_string();
                self.commit(std::slice::from_ref(&setting)).await?;
            }
        }
        self.get_settings().await
    }

    /// Persist rows atomically and mirror them into the runtime config
    async fn commit(&self, changes: &[ServerSetting]) -> Result<(), SettingsError> {
        if let Err(e) = self.repo.save_all(changes).await {
            let keys: Vec<_> = changes.iter().map(|s| s.key).collect();
            error!(error = %e, ?keys, "Failed to commit server settings, rolled back");
            return Err(SettingsError::Persistence);
        }
        self.config_store.apply_all(changes);
        Ok(())
    }

    async fn fire(&self, effect: &SideEffect) {
        let c = &self.collaborators;
        let result = match effect {
            SideEffect::StatCollection(true) => c.scheduler.schedule_stats_tasks().await,
            SideEffect::StatCollection(false) => {
                c.scheduler.cancel_stats_tasks();
                Ok(())
            }
            SideEffect::FolderWatching(true) => c.watcher.start_watching().await,
            SideEffect::FolderWatching(false) => {
                c.watcher.stop_watching();
                Ok(())
            }
            SideEffect::LogLevel(level) => c.log_level.switch_level(*level),
            SideEffect::EmailRelay(url) => c.email.configure_relay(url),
        };

        if let Err(e) = result {
            warn!(?effect, error = %e, "Settings side effect failed");
        }
    }

    /// Move bookmarks into the committed directory. Runs after commit and is
    /// not rolled back; the old directory is only removed once the copy
    /// succeeded, so a failed run can be repeated.
    fn migrate_bookmarks(&self, migration: &BookmarkMigration) {
        let dirs = &self.collaborators.directories;
        let result = dirs
            .exist_or_create(&migration.to)
            .and_then(|_| dirs.copy_directory_to_directory(&migration.from, &migration.to))
            .and_then(|_| dirs.clear_and_delete_directory(&migration.from));

        match result {
            Ok(()) => info!(
                from = %migration.from.display(),
                to = %migration.to.display(),
                "Moved bookmarks to new directory"
            ),
            Err(e) => error!(
                error = %e,
                from = %migration.from.display(),
                to = %migration.to.display(),
                "Failed to move bookmarks to new directory"
            ),
        }
    }

    async fn reschedule(&self) {
        if let Err(e) = self.collaborators.scheduler.schedule_tasks().await {
            warn!(error = %e, "Failed to reschedule recurring tasks");
        }
    }

    async fn load_all(&self) -> Result<Vec<ServerSetting>, SettingsError> {
        self.repo.find_all().await.map_err(|e| {
            error!(error = %e, "Failed to load server settings");
            SettingsError::Internal
        })
    }

    async fn find_required(&self, key: ServerSettingKey) -> Result<ServerSetting, SettingsError> {
        self.repo
            .find_by_key(key)
            .await
            .map_err(|e| {
                error!(error = %e, %key, "Failed to load server setting");
                SettingsError::Internal
            })?
            .ok_or(SettingsError::NotFound { key })
    }
}
