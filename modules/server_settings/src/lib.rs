//! Server Settings Module
//!
//! Owns the server configuration table of the reader server: one row per
//! [`ServerSettingKey`], reconciled against a typed desired state with
//! key-specific validation and side effects (task rescheduling, folder
//! watching, live log level, email relay client).

// Public exports
pub mod contract;
pub use contract::{
    client::ServerSettingsApi, error::SettingsError, AuthContext, EmailTestResult, EncodeFormat,
    LibraryType, LogLevel, ServerSetting, ServerSettingKey, ServerSettings, TaskFrequency,
};

pub mod module;
pub use module::ServerSettingsModule;

pub mod config;
pub use config::Config;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
