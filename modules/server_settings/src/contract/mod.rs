//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::ServerSettingsApi;
pub use error::SettingsError;
pub use model::{
    AuthContext, EmailTestResult, EncodeFormat, LibraryType, LogLevel, ServerSetting,
    ServerSettingKey, ServerSettings, TaskFrequency, BOOKMARKS_FOLDER, DEFAULT_BASE_URL,
    DEFAULT_EMAIL_SERVICE_URL, DEFAULT_IP_ADDRESSES, RETENTION_MAX, RETENTION_MIN,
};
