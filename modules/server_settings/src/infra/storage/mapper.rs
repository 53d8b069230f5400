//! Entity to model mappers

use super::entity;
use crate::contract::{ServerSetting, ServerSettingKey};

impl TryFrom<entity::Model> for ServerSetting {
    type Error = anyhow::Error;

    fn try_from(entity: entity::Model) -> Result<Self, Self::Error> {
        let key: ServerSettingKey = entity
            .key
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;

        Ok(Self {
            key,
            value: entity.value,
        })
    }
}

impl From<&ServerSetting> for entity::ActiveModel {
    fn from(model: &ServerSetting) -> Self {
        use sea_orm::ActiveValue::*;

        Self {
            key: Set(model.key.as_str().to_string()),
            value: Set(model.value.clone()),
            updated_at: Set(chrono::Utc::now()),
        }
    }
}
