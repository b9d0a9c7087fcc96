use std::time::Duration;

use sea_orm::sea_query::Index;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::favorite;

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    opt.max_connections(20)
        .min_connections(2)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    sync_schema(&db).await?;

    Ok(db)
}

/// Create or update tables for every registered entity, then ensure indexes.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.get_schema_registry("gallery::entity::*")
        .sync(db)
        .await?;
    ensure_indexes(db).await
}

/// Ensure secondary indexes exist.
///
/// The favorite primary key leads with `viewer_id`; popularity ranking joins
/// on `asset_id`, which needs its own index.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Index::create()
        .if_not_exists()
        .name("idx_favorite_asset")
        .table(favorite::Entity)
        .col(favorite::Column::AssetId)
        .to_owned();

    let backend = db.get_database_backend();
    match db.execute_raw(backend.build(&stmt)).await {
        Ok(_) => info!("Ensured index idx_favorite_asset exists"),
        Err(e) => warn!("Failed to create index idx_favorite_asset: {}", e),
    }

    Ok(())
}
