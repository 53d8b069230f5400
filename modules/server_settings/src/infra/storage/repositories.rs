//! SeaORM repository implementations

use crate::contract::{ServerSetting, ServerSettingKey};
use crate::domain::repository::SettingsRepository;
use anyhow::{bail, Result};
use async_trait::async_trait;
use sea_orm::{
    prelude::Expr, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

use super::entity;

pub struct SeaOrmSettingsRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmSettingsRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn write_rows(txn: &DatabaseTransaction, settings: &[ServerSetting]) -> Result<()> {
        let now = chrono::Utc::now();
        for setting in settings {
            let result = entity::Entity::update_many()
                .col_expr(entity::Column::Value, Expr::value(setting.value.clone()))
                .col_expr(entity::Column::UpdatedAt, Expr::value(now))
                .filter(entity::Column::Key.eq(setting.key.as_str()))
                .exec(txn)
                .await?;

            if result.rows_affected == 0 {
                bail!("no row for setting {}", setting.key);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for SeaOrmSettingsRepository {
    async fn find_all(&self) -> Result<Vec<ServerSetting>> {
        let results = entity::Entity::find()
            .order_by_asc(entity::Column::Key)
            .all(&*self.db)
            .await?;

        // Rows left behind by other versions are not ours to interpret
        let settings = results
            .into_iter()
            .filter_map(|row| {
                let key = row.key.clone();
                ServerSetting::try_from(row)
                    .inspect_err(|e| warn!(%key, error = %e, "Skipping unrecognized setting row"))
                    .ok()
            })
            .collect();

        Ok(settings)
    }

    async fn find_by_key(&self, key: ServerSettingKey) -> Result<Option<ServerSetting>> {
        let result = entity::Entity::find_by_id(key.as_str().to_string())
            .one(&*self.db)
            .await?;

        result.map(ServerSetting::try_from).transpose()
    }

    async fn save_all(&self, settings: &[ServerSetting]) -> Result<()> {
        let txn = self.db.begin().await?;

        if let Err(e) = Self::write_rows(&txn, settings).await {
            txn.rollback().await?;
            return Err(e);
        }

        txn.commit().await?;
        Ok(())
    }

    async fn insert_missing(&self, settings: &[ServerSetting]) -> Result<usize> {
        let txn = self.db.begin().await?;

        let existing: HashSet<String> = entity::Entity::find()
            .all(&txn)
            .await?
            .into_iter()
            .map(|row| row.key)
            .collect();

        let missing: Vec<entity::ActiveModel> = settings
            .iter()
            .filter(|s| !existing.contains(s.key.as_str()))
            .map(entity::ActiveModel::from)
            .collect();

        let inserted = missing.len();
        if inserted > 0 {
            entity::Entity::insert_many(missing).exec(&txn).await?;
        }

        txn.commit().await?;
        Ok(inserted)
    }
}
