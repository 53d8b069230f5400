//! Module declaration and lifecycle

use crate::api::native::NativeClient;
use crate::config::Config;
use crate::contract::ServerSettingsApi;
use crate::domain::{Collaborators, ConfigStore, LogLevelSwitch, Service};
use crate::infra::storage::SeaOrmSettingsRepository;
use crate::infra::{
    HttpEmailService, IntervalTaskScheduler, JsonLocalizer, LocalDirectoryService,
    MaintenanceJobs, NotifyLibraryWatcher,
};
use anyhow::Result;
use parking_lot::RwLock;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Server settings module
pub struct ServerSettingsModule {
    config: RwLock<Config>,
    service: RwLock<Option<Arc<Service>>>,
    scheduler: RwLock<Option<Arc<IntervalTaskScheduler>>>,
}

impl Default for ServerSettingsModule {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl ServerSettingsModule {
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
            service: RwLock::new(None),
            scheduler: RwLock::new(None),
        }
    }

    /// Run database migrations
    pub async fn migrate(&self, db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("Server settings migrations completed");
        Ok(())
    }

    /// Wire the service and its collaborators, then seed the table
    pub async fn init(
        &self,
        db: Arc<DatabaseConnection>,
        log_level: Arc<dyn LogLevelSwitch>,
    ) -> Result<()> {
        let cfg = self.config.read().clone();

        let repo = Arc::new(SeaOrmSettingsRepository::new(db));
        let directories = Arc::new(LocalDirectoryService::from_current_dir()?);
        let jobs = Arc::new(MaintenanceJobs::new(
            repo.clone(),
            directories.clone(),
            cfg.log_directory.clone(),
        ));
        let scheduler = Arc::new(IntervalTaskScheduler::new(repo.clone(), jobs));

        let collaborators = Collaborators {
            scheduler: scheduler.clone(),
            watcher: Arc::new(NotifyLibraryWatcher::new(cfg.library_roots.clone())),
            log_level,
            email: Arc::new(HttpEmailService::new(cfg.email_timeout)),
            directories,
            localizer: Arc::new(JsonLocalizer::bundled()?),
        };

        let service = Arc::new(Service::new(
            repo,
            collaborators,
            Arc::new(ConfigStore::default()),
            cfg.containerized,
        ));
        let inserted = service.seed_defaults().await?;

        *self.service.write() = Some(service);
        *self.scheduler.write() = Some(scheduler);

        tracing::info!(
            inserted,
            containerized = cfg.containerized,
            "Server settings module initialized"
        );
        Ok(())
    }

    pub fn service(&self) -> Result<Arc<Service>> {
        self.service
            .read()
            .as_ref()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client for other modules
    pub fn client(&self) -> Result<Arc<dyn ServerSettingsApi>> {
        Ok(Arc::new(NativeClient::new(self.service()?)))
    }

    /// Runtime configuration mirror shared with the web host
    pub fn config_store(&self) -> Result<Arc<ConfigStore>> {
        Ok(self.service()?.config_store())
    }

    pub fn register_rest(&self, router: axum::Router) -> Result<axum::Router> {
        let service = self.service()?;
        tracing::info!("Registering server settings REST routes");
        Ok(crate::api::rest::routes::register_routes(router, service))
    }

    /// Start background work and run until cancelled
    pub async fn serve(self: Arc<Self>, cancel: CancellationToken) -> Result<()> {
        let service = self.service()?;
        service.start_background().await?;

        cancel.cancelled().await;

        service.shutdown();
        if let Some(scheduler) = self.scheduler.read().as_ref() {
            scheduler.shutdown();
        }
        tracing::info!("Server settings module stopped");
        Ok(())
    }
}
