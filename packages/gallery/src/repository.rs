use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, sea_query::LockType,
};

use crate::entity::{asset, favorite, viewer};
use crate::models::catalog::CatalogSort;

/// Asset row joined with its favorite count.
#[derive(Debug, Clone, FromQueryResult)]
pub struct RankedAsset {
    pub id: i32,
    pub blob_key: String,
    pub prompt: String,
    pub creator_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub favorite_count: i64,
}

/// Metadata access for assets, viewers and favorites.
///
/// Generic over the connection so the same queries run on a pool or inside a
/// transaction.
pub struct AssetRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> AssetRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    // -----------------------------------------------------------------------
    // Assets
    // -----------------------------------------------------------------------

    pub async fn create_asset(
        &self,
        blob_key: &str,
        prompt: &str,
        creator_email: Option<&str>,
    ) -> Result<asset::Model, DbErr> {
        let model = asset::ActiveModel {
            blob_key: Set(blob_key.to_string()),
            prompt: Set(prompt.to_string()),
            creator_email: Set(creator_email.map(str::to_string)),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        model.insert(self.conn).await
    }

    pub async fn find_by_blob_key(&self, blob_key: &str) -> Result<Option<asset::Model>, DbErr> {
        asset::Entity::find()
            .filter(asset::Column::BlobKey.eq(blob_key))
            .one(self.conn)
            .await
    }

    /// Like [`Self::find_by_blob_key`], holding a row lock until the
    /// surrounding transaction ends.
    pub async fn find_by_blob_key_for_update(
        &self,
        blob_key: &str,
    ) -> Result<Option<asset::Model>, DbErr> {
        asset::Entity::find()
            .filter(asset::Column::BlobKey.eq(blob_key))
            .lock(LockType::Update)
            .one(self.conn)
            .await
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        asset::Entity::find().count(self.conn).await
    }

    /// One page of assets with favorite counts, in `sort` order.
    ///
    /// Popularity ties are broken by id so page boundaries stay stable.
    pub async fn list_ranked(
        &self,
        sort: CatalogSort,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<RankedAsset>, DbErr> {
        let select = ranked_select();
        let select = match sort {
            CatalogSort::Popularity => select
                .order_by(favorite::Column::ViewerId.count(), Order::Desc)
                .order_by_asc(asset::Column::Id),
            CatalogSort::Newest => select.order_by_desc(asset::Column::Id),
        };

        select
            .offset(Some(offset))
            .limit(Some(limit))
            .into_model::<RankedAsset>()
            .all(self.conn)
            .await
    }

    /// Ranked rows for the given asset ids, in no particular order.
    pub async fn ranked_by_ids(&self, ids: &[i32]) -> Result<Vec<RankedAsset>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        ranked_select()
            .filter(asset::Column::Id.is_in(ids.iter().copied()))
            .into_model::<RankedAsset>()
            .all(self.conn)
            .await
    }

    // -----------------------------------------------------------------------
    // Viewers
    // -----------------------------------------------------------------------

    pub async fn find_viewer_by_email(&self, email: &str) -> Result<Option<viewer::Model>, DbErr> {
        viewer::Entity::find()
            .filter(viewer::Column::Email.eq(email))
            .one(self.conn)
            .await
    }

    /// Get or create the viewer with this email.
    pub async fn ensure_viewer(&self, email: &str) -> Result<viewer::Model, DbErr> {
        if let Some(existing) = self.find_viewer_by_email(email).await? {
            return Ok(existing);
        }

        let model = viewer::ActiveModel {
            email: Set(email.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        match model.insert(self.conn).await {
            Ok(inserted) => Ok(inserted),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => self
                .find_viewer_by_email(email)
                .await?
                .ok_or_else(|| {
                    DbErr::Custom("UniqueConstraintViolation but viewer not found".to_string())
                }),
            Err(e) => Err(e),
        }
    }

    // -----------------------------------------------------------------------
    // Favorites
    // -----------------------------------------------------------------------

    /// Which of `asset_ids` the viewer has favorited.
    pub async fn favorited_asset_ids(
        &self,
        viewer_id: i32,
        asset_ids: &[i32],
    ) -> Result<Vec<i32>, DbErr> {
        if asset_ids.is_empty() {
            return Ok(Vec::new());
        }
        favorite::Entity::find()
            .filter(favorite::Column::ViewerId.eq(viewer_id))
            .filter(favorite::Column::AssetId.is_in(asset_ids.iter().copied()))
            .select_only()
            .column(favorite::Column::AssetId)
            .into_tuple::<i32>()
            .all(self.conn)
            .await
    }

    /// All assets favorited by the viewer, most recently favorited first.
    pub async fn favorites_of(&self, viewer_id: i32) -> Result<Vec<RankedAsset>, DbErr> {
        let ids: Vec<i32> = favorite::Entity::find()
            .filter(favorite::Column::ViewerId.eq(viewer_id))
            .order_by_desc(favorite::Column::CreatedAt)
            .order_by_desc(favorite::Column::AssetId)
            .select_only()
            .column(favorite::Column::AssetId)
            .into_tuple::<i32>()
            .all(self.conn)
            .await?;

        let position: HashMap<i32, usize> =
            ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let mut rows = self.ranked_by_ids(&ids).await?;
        rows.sort_by_key(|r| position.get(&r.id).copied().unwrap_or(usize::MAX));
        Ok(rows)
    }

    /// Delete the (viewer, asset) favorite. Returns whether a row was removed.
    pub async fn remove_favorite(&self, viewer_id: i32, asset_id: i32) -> Result<bool, DbErr> {
        let result = favorite::Entity::delete_many()
            .filter(favorite::Column::ViewerId.eq(viewer_id))
            .filter(favorite::Column::AssetId.eq(asset_id))
            .exec(self.conn)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn add_favorite(&self, viewer_id: i32, asset_id: i32) -> Result<(), DbErr> {
        let model = favorite::ActiveModel {
            viewer_id: Set(viewer_id),
            asset_id: Set(asset_id),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        favorite::Entity::insert(model)
            .exec_without_returning(self.conn)
            .await?;
        Ok(())
    }
}

fn ranked_select() -> sea_orm::Select<asset::Entity> {
    asset::Entity::find()
        .select_only()
        .column(asset::Column::Id)
        .column(asset::Column::BlobKey)
        .column(asset::Column::Prompt)
        .column(asset::Column::CreatorEmail)
        .column(asset::Column::CreatedAt)
        .column_as(favorite::Column::ViewerId.count(), "favorite_count")
        .left_join(favorite::Entity)
        .group_by(asset::Column::Id)
        .group_by(asset::Column::BlobKey)
        .group_by(asset::Column::Prompt)
        .group_by(asset::Column::CreatorEmail)
        .group_by(asset::Column::CreatedAt)
}
