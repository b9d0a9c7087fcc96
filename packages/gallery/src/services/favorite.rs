use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, instrument};

use crate::entity::viewer;
use crate::error::AppError;
use crate::models::generation::ToggleOutcome;
use crate::repository::AssetRepository;

pub struct FavoriteService {
    db: DatabaseConnection,
}

impl FavoriteService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Flip the favorite state of (viewer, asset).
    ///
    /// Runs in one transaction holding a row lock on the asset, so concurrent
    /// toggles on the same asset apply one after another. The composite
    /// primary key rejects a second row for the pair regardless. Neither the
    /// asset nor the viewer is created here.
    #[instrument(skip(self))]
    pub async fn toggle(
        &self,
        blob_key: &str,
        viewer_email: &str,
    ) -> Result<ToggleOutcome, AppError> {
        let email = viewer_email.trim();
        if email.is_empty() {
            return Err(AppError::Validation("Viewer email must not be empty".into()));
        }

        let txn = self.db.begin().await?;
        let repo = AssetRepository::new(&txn);

        let asset = repo
            .find_by_blob_key_for_update(blob_key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Asset '{blob_key}' not found")))?;
        let viewer = repo
            .find_viewer_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Viewer '{email}' not found")))?;

        let outcome = if repo.remove_favorite(viewer.id, asset.id).await? {
            ToggleOutcome::ToggledOff
        } else {
            repo.add_favorite(viewer.id, asset.id).await?;
            ToggleOutcome::ToggledOn
        };

        txn.commit().await?;
        info!(asset_id = asset.id, viewer_id = viewer.id, ?outcome, "Toggled favorite");
        Ok(outcome)
    }

    /// Get or create a viewer. Called on first authenticated visit.
    #[instrument(skip(self))]
    pub async fn ensure_viewer(&self, email: &str) -> Result<viewer::Model, AppError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::Validation("Viewer email must not be empty".into()));
        }
        Ok(AssetRepository::new(&self.db).ensure_viewer(email).await?)
    }
}
