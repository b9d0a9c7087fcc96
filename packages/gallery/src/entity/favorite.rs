use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A viewer's favorite mark on an asset.
///
/// The composite primary key makes (viewer, asset) unique. Rows are removed
/// with either parent.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "favorite")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub viewer_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub asset_id: i32,
    #[sea_orm(belongs_to, from = "viewer_id", to = "id", on_delete = "Cascade")]
    pub viewer: Option<super::viewer::Entity>,
    #[sea_orm(belongs_to, from = "asset_id", to = "id", on_delete = "Cascade")]
    pub asset: Option<super::asset::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
