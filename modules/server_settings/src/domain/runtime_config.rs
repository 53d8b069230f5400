//! Process-wide configuration mirror
//!
//! A handful of settings are also consulted outside the settings table (the
//! web host binds to `port`/`ip_addresses`, the router honours `base_url`).
//! The store is injected wherever those values are needed and refreshed by
//! the settings service after each successful commit.

use crate::contract::{
    LogLevel, ServerSetting, ServerSettingKey, DEFAULT_BASE_URL, DEFAULT_IP_ADDRESSES,
};
use parking_lot::RwLock;

/// Values mirrored out of the settings table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub port: u16,
    pub ip_addresses: String,
    pub base_url: String,
    pub cache_size_mb: i64,
    pub log_level: LogLevel,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            ip_addresses: DEFAULT_IP_ADDRESSES.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_size_mb: 75,
            log_level: LogLevel::Debug,
        }
    }
}

impl RuntimeConfig {
    /// Fold one settings row into the mirror. Rows for keys that are not
    /// mirrored, or whose value does not parse, leave it untouched.
    pub fn apply(&mut self, setting: &ServerSetting) {
        match setting.key {
            ServerSettingKey::Port => {
                if let Ok(port) = setting.value.trim().parse() {
                    self.port = port;
                }
            }
            ServerSettingKey::IpAddresses => self.ip_addresses = setting.value.clone(),
            ServerSettingKey::BaseUrl => self.base_url = setting.value.clone(),
            ServerSettingKey::CacheSize => {
                if let Ok(size) = setting.value.trim().parse() {
                    self.cache_size_mb = size;
                }
            }
            ServerSettingKey::LoggingLevel => {
                if let Ok(level) = setting.value.parse() {
                    self.log_level = level;
                }
            }
            _ => {}
        }
    }
}

/// Shared, injectable holder of the [`RuntimeConfig`]
#[derive(Debug, Default)]
pub struct ConfigStore {
    inner: RwLock<RuntimeConfig>,
}

impl ConfigStore {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            inner: RwLock::new(config),
        }
    }

    /// Build a mirror from the persisted rows on top of defaults
    pub fn from_settings(settings: &[ServerSetting]) -> Self {
        let mut config = RuntimeConfig::default();
        for setting in settings {
            config.apply(setting);
        }
        Self::new(config)
    }

    pub fn snapshot(&self) -> RuntimeConfig {
        self.inner.read().clone()
    }

    pub fn update(&self, f: impl FnOnce(&mut RuntimeConfig)) {
        f(&mut self.inner.write());
    }

    pub fn apply_all(&self, settings: &[ServerSetting]) {
        let mut config = self.inner.write();
        for setting in settings {
            config.apply(setting);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_ignores_unmirrored_and_malformed_rows() {
        let store = ConfigStore::default();
        store.apply_all(&[
            ServerSetting::new(ServerSettingKey::Port, "8080"),
            ServerSetting::new(ServerSettingKey::CacheSize, "not-a-number"),
            ServerSetting::new(ServerSettingKey::HostName, "reader.example.com"),
            ServerSetting::new(ServerSettingKey::LoggingLevel, "Warning"),
        ]);

        let config = store.snapshot();
        assert_eq!(config.port, 8080);
        assert_eq!(config.cache_size_mb, 75);
        assert_eq!(config.log_level, LogLevel::Warning);
    }

    #[test]
    fn test_from_settings_starts_from_defaults() {
        let store = ConfigStore::from_settings(&[ServerSetting::new(
            ServerSettingKey::BaseUrl,
            "/reader/",
        )]);

        let config = store.snapshot();
        assert_eq!(config.base_url, "/reader/");
        assert_eq!(config.ip_addresses, DEFAULT_IP_ADDRESSES);
    }
}
