//! Repository trait for data access
//!
//! Implementation is in infra/storage/repositories.rs

use crate::contract::{ServerSetting, ServerSettingKey};
use anyhow::Result;
use async_trait::async_trait;

/// Repository for the server settings table
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load every settings row
    async fn find_all(&self) -> Result<Vec<ServerSetting>>;

    /// Find a single row by key
    async fn find_by_key(&self, key: ServerSettingKey) -> Result<Option<ServerSetting>>;

    /// Overwrite the given rows in one transaction.
    ///
    /// Either every row is written or, on failure, the transaction is rolled
    /// back and nothing is.
    async fn save_all(&self, settings: &[ServerSetting]) -> Result<()>;

    /// Insert rows whose key is not present yet, returning how many were added
    async fn insert_missing(&self, settings: &[ServerSetting]) -> Result<usize>;
}
