use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use common::{BlobKey, BlobStore};
use sea_orm::DatabaseConnection;
use tracing::{debug, instrument};

use crate::config::CatalogConfig;
use crate::error::AppError;
use crate::models::catalog::{AssetView, CatalogPage, CatalogQuery, Download};
use crate::repository::{AssetRepository, RankedAsset};
use crate::utils::pagination::{page_window, paginate};

/// Upper bound on a requested page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Read side of the gallery: listings, favorites and blob access.
pub struct CatalogService {
    db: DatabaseConnection,
    blob_store: Arc<dyn BlobStore>,
    default_page_size: u64,
    signed_url_ttl: Duration,
    download_path_prefix: String,
}

impl CatalogService {
    pub fn new(
        db: DatabaseConnection,
        blob_store: Arc<dyn BlobStore>,
        config: &CatalogConfig,
    ) -> Self {
        Self {
            db,
            blob_store,
            default_page_size: config.page_size.max(1),
            signed_url_ttl: config.signed_url_ttl(),
            download_path_prefix: config.download_path_prefix.clone(),
        }
    }

    /// One page of the catalog annotated for `query.viewer_email`.
    #[instrument(skip(self, query), fields(page = query.page, sort = ?query.sort))]
    pub async fn list(&self, query: &CatalogQuery) -> Result<CatalogPage, AppError> {
        let page_size = query.page_size.unwrap_or(self.default_page_size);
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(AppError::Validation(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        let repo = AssetRepository::new(&self.db);
        let total = repo.count().await?;
        // Past the last page nothing is queried; this also keeps OFFSET within i64.
        let offset = query.page.saturating_mul(page_size);
        let rows = if offset < total {
            repo.list_ranked(query.sort, offset, page_size).await?
        } else {
            Vec::new()
        };

        let favorited = self
            .favorited_among(&repo, query.viewer_email.as_deref(), &rows)
            .await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            let is_favorited = favorited.contains(&row.id);
            items.push(self.view(row, is_favorited).await);
        }

        let pagination = paginate(query.page, page_size, total);
        let page_window = page_window(query.page, pagination.total_pages);
        debug!(total, returned = items.len(), "Listed catalog page");

        Ok(CatalogPage {
            items,
            pagination,
            page_window,
        })
    }

    /// Everything the viewer has favorited, most recent first.
    ///
    /// An unknown or empty email yields an empty list.
    #[instrument(skip(self))]
    pub async fn favorites(&self, viewer_email: &str) -> Result<Vec<AssetView>, AppError> {
        let email = viewer_email.trim();
        if email.is_empty() {
            return Ok(Vec::new());
        }
        let repo = AssetRepository::new(&self.db);
        let Some(viewer) = repo.find_viewer_by_email(email).await? else {
            return Ok(Vec::new());
        };

        let rows = repo.favorites_of(viewer.id).await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(self.view(row, true).await);
        }
        Ok(items)
    }

    /// Signed URL for a blob, or the download path when signing is unavailable.
    #[instrument(skip(self))]
    pub async fn display_url(&self, blob_key: &str) -> Result<String, AppError> {
        let key = BlobKey::parse(blob_key)?;
        Ok(self.resolve_url(&key).await)
    }

    /// Fetch blob bytes with a content type inferred from the key.
    #[instrument(skip(self))]
    pub async fn download(&self, blob_key: &str) -> Result<Download, AppError> {
        let key = BlobKey::parse(blob_key)?;
        let bytes = self.blob_store.get(&key).await?;
        let content_type = mime_guess::from_path(key.as_str())
            .first_or_octet_stream()
            .to_string();
        Ok(Download {
            bytes,
            content_type,
        })
    }

    async fn favorited_among(
        &self,
        repo: &AssetRepository<'_, DatabaseConnection>,
        viewer_email: Option<&str>,
        rows: &[RankedAsset],
    ) -> Result<HashSet<i32>, AppError> {
        let Some(email) = viewer_email.map(str::trim).filter(|e| !e.is_empty()) else {
            return Ok(HashSet::new());
        };
        let Some(viewer) = repo.find_viewer_by_email(email).await? else {
            return Ok(HashSet::new());
        };
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        Ok(repo
            .favorited_asset_ids(viewer.id, &ids)
            .await?
            .into_iter()
            .collect())
    }

    async fn view(&self, row: RankedAsset, is_favorited: bool) -> AssetView {
        let fallback_path = self.fallback_path(&row.blob_key);
        let display_url = match BlobKey::parse(&row.blob_key) {
            Ok(key) => self.resolve_url(&key).await,
            Err(_) => fallback_path.clone(),
        };

        AssetView {
            display_url,
            fallback_path,
            blob_key: row.blob_key,
            prompt: row.prompt,
            creator_email: row.creator_email,
            favorite_count: row.favorite_count.max(0) as u64,
            is_favorited,
            created_at: row.created_at,
        }
    }

    async fn resolve_url(&self, key: &BlobKey) -> String {
        match self.blob_store.sign(key, self.signed_url_ttl).await {
            Some(url) => url,
            None => self.fallback_path(key.as_str()),
        }
    }

    fn fallback_path(&self, blob_key: &str) -> String {
        format!("{}{}", self.download_path_prefix, blob_key)
    }
}
