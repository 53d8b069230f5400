//! Native client trait for inter-module communication
//!
//! Other modules (OPDS feed, scheduler, web host) read and change server
//! settings through this trait without going over HTTP.

use super::{
    error::SettingsError,
    model::{AuthContext, EmailTestResult, ServerSettings},
};
use async_trait::async_trait;

/// Server settings API for inter-module communication
#[async_trait]
pub trait ServerSettingsApi: Send + Sync {
    /// Current base URL the server is hosted under
    async fn base_url(&self) -> Result<String, SettingsError>;

    /// Whether the OPDS feed is enabled
    async fn opds_enabled(&self) -> Result<bool, SettingsError>;

    /// Full typed snapshot of the settings table
    async fn get_settings(&self) -> Result<ServerSettings, SettingsError>;

    /// Reconcile the table against a desired state
    async fn update_settings(
        &self,
        desired: ServerSettings,
        auth: &AuthContext,
    ) -> Result<ServerSettings, SettingsError>;

    /// Restore every setting to its default
    async fn reset_settings(&self, auth: &AuthContext) -> Result<ServerSettings, SettingsError>;

    /// Restore the bind address allowlist
    async fn reset_ip_addresses(&self, auth: &AuthContext)
        -> Result<ServerSettings, SettingsError>;

    /// Restore the base URL
    async fn reset_base_url(&self, auth: &AuthContext) -> Result<ServerSettings, SettingsError>;

    /// Restore the email relay endpoint
    async fn reset_email_url(&self, auth: &AuthContext) -> Result<ServerSettings, SettingsError>;

    /// Probe an email relay on behalf of the caller
    async fn test_email_url(
        &self,
        url: &str,
        auth: &AuthContext,
    ) -> Result<EmailTestResult, SettingsError>;
}
