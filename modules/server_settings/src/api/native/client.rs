//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    AuthContext, EmailTestResult, ServerSettings, ServerSettingsApi, SettingsError,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client that directly calls the domain service
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ServerSettingsApi for NativeClient {
    async fn base_url(&self) -> Result<String, SettingsError> {
        self.service.get_base_url().await
    }

    async fn opds_enabled(&self) -> Result<bool, SettingsError> {
        self.service.is_opds_enabled().await
    }

    async fn get_settings(&self) -> Result<ServerSettings, SettingsError> {
        self.service.get_settings().await
    }

    async fn update_settings(
        &self,
        desired: ServerSettings,
        auth: &AuthContext,
    ) -> Result<ServerSettings, SettingsError> {
        self.service.update_settings(desired, auth).await
    }

    async fn reset_settings(&self, auth: &AuthContext) -> Result<ServerSettings, SettingsError> {
        self.service.reset_settings(auth).await
    }

    async fn reset_ip_addresses(
        &self,
        auth: &AuthContext,
    ) -> Result<ServerSettings, SettingsError> {
        self.service.reset_ip_addresses(auth).await
    }

    async fn reset_base_url(&self, auth: &AuthContext) -> Result<ServerSettings, SettingsError> {
        self.service.reset_base_url(auth).await
    }

    async fn reset_email_url(&self, auth: &AuthContext) -> Result<ServerSettings, SettingsError> {
        self.service.reset_email_url(auth).await
    }

    async fn test_email_url(
        &self,
        url: &str,
        auth: &AuthContext,
    ) -> Result<EmailTestResult, SettingsError> {
        self.service.test_email_url(url, auth).await
    }
}
