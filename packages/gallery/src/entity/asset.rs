use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asset")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Object-store key. Immutable once written.
    #[sea_orm(unique)]
    pub blob_key: String,

    #[sea_orm(column_type = "Text")]
    pub prompt: String,

    /// Creator identity; `None` for anonymous generations.
    pub creator_email: Option<String>,

    #[sea_orm(has_many)]
    pub favorites: HasMany<super::favorite::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
