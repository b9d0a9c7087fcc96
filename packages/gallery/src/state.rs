use std::sync::Arc;

use common::storage::filesystem::FilesystemBlobStore;
use common::storage::s3::S3BlobStore;
use common::{BlobStore, StorageAppConfig, StorageBackend, StorageError};
use provider::{
    ErrorClassifier, GeminiConfig, GeminiProvider, ImageProvider, MockProvider,
    TextErrorClassifier,
};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::{AppConfig, ProviderConfig};
use crate::error::AppError;
use crate::services::{CatalogService, FavoriteService, GenerationOrchestrator, GenerationSettings};

/// Wired services sharing one pool and one blob store.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub blob_store: Arc<dyn BlobStore>,
    pub generator: Arc<GenerationOrchestrator>,
    pub catalog: Arc<CatalogService>,
    pub favorites: Arc<FavoriteService>,
}

impl AppState {
    pub async fn from_config(
        config: &AppConfig,
        db: DatabaseConnection,
    ) -> Result<Self, AppError> {
        let blob_store = open_blob_store(&config.storage).await?;
        let provider = build_provider(&config.provider)?;
        Ok(Self::assemble(
            config,
            db,
            blob_store,
            provider,
            Arc::new(TextErrorClassifier),
        ))
    }

    /// Wire services from already-constructed collaborators.
    pub fn assemble(
        config: &AppConfig,
        db: DatabaseConnection,
        blob_store: Arc<dyn BlobStore>,
        provider: Arc<dyn ImageProvider>,
        classifier: Arc<dyn ErrorClassifier>,
    ) -> Self {
        let settings =
            GenerationSettings::branded(&config.provider.model, &config.provider.aspect_ratio);
        let generator = GenerationOrchestrator::new(
            provider,
            classifier,
            blob_store.clone(),
            db.clone(),
            settings,
        );
        let catalog = CatalogService::new(db.clone(), blob_store.clone(), &config.catalog);
        let favorites = FavoriteService::new(db.clone());

        Self {
            db,
            blob_store,
            generator: Arc::new(generator),
            catalog: Arc::new(catalog),
            favorites: Arc::new(favorites),
        }
    }
}

/// Construct the configured blob store.
pub async fn open_blob_store(config: &StorageAppConfig) -> Result<Arc<dyn BlobStore>, AppError> {
    match config.backend {
        StorageBackend::Filesystem => {
            let store =
                FilesystemBlobStore::new(config.base_path.clone(), config.max_blob_size).await?;
            info!(path = %config.base_path.display(), "Using filesystem blob store");
            Ok(Arc::new(store))
        }
        StorageBackend::S3 => {
            let s3 = config.s3.as_ref().ok_or_else(|| {
                AppError::from(StorageError::Backend(
                    "storage.backend = \"s3\" requires a [storage.s3] section".into(),
                ))
            })?;
            let store = S3BlobStore::new(s3, config.max_blob_size)?;
            info!(bucket = %s3.bucket, "Using S3 blob store");
            Ok(Arc::new(store))
        }
    }
}

/// The Gemini client, or the placeholder provider in mock mode.
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn ImageProvider>, AppError> {
    if config.mock_mode {
        info!("Provider mock mode enabled");
        return Ok(Arc::new(MockProvider));
    }
    let gemini = GeminiProvider::new(GeminiConfig {
        api_key: config.api_key.clone(),
        api_base: config.api_base.clone(),
        request_timeout: config.request_timeout(),
    })
    .map_err(|e| AppError::Internal(format!("Failed to configure provider: {e}")))?;
    Ok(Arc::new(gemini))
}
