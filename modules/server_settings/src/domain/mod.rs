//! Domain layer - business logic and services

pub mod collaborators;
pub mod converter;
pub mod reconciler;
pub mod repository;
pub mod runtime_config;
pub mod service;

pub use collaborators::{
    Collaborators, DirectoryService, EmailService, LibraryWatcher, Localizer, LogLevelSwitch,
    TaskScheduler,
};
pub use repository::SettingsRepository;
pub use runtime_config::{ConfigStore, RuntimeConfig};
pub use service::Service;
