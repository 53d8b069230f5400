//! SeaORM entities for database tables

use sea_orm::entity::prelude::*;

/// Server settings table entity, one row per key
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "server_setting")]
pub struct Model {
    /// Setting name (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub key: String,

    /// Serialized value
    pub value: String,

    /// Last update timestamp
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
