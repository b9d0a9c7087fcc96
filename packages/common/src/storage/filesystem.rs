use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::key::BlobKey;
use super::traits::BlobStore;

/// Filesystem-backed blob store.
///
/// Objects are stored in a sharded directory layout:
/// `{base_path}/{first 2 key chars}/{key}`
///
/// Local files have no signing authority, so [`BlobStore::sign`] always
/// returns `None` and callers fall back to their own download path.
pub struct FilesystemBlobStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemBlobStore {
    /// Open a store rooted at `base_path`, creating it and its staging dir.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".staging")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    /// Compute the filesystem path for a given key.
    fn blob_path(&self, key: &BlobKey) -> PathBuf {
        self.base_path.join(key.shard_prefix()).join(key.as_str())
    }

    /// Fresh staging path; renamed into place once fully written.
    fn staging_path(&self) -> PathBuf {
        self.base_path
            .join(".staging")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put(
        &self,
        key: &BlobKey,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let blob_path = self.blob_path(key);

        // Write to a temp file first so readers never observe a partial object.
        let staged = self.staging_path();
        if let Err(e) = fs::write(&staged, data).await {
            let _ = fs::remove_file(&staged).await;
            return Err(e.into());
        }

        if let Some(parent) = blob_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&staged, &blob_path).await {
            let _ = fs::remove_file(&staged).await;
            return Err(e.into());
        }

        tracing::debug!(key = %key, content_type, size = data.len(), "Stored blob on disk");
        Ok(())
    }

    async fn get(&self, key: &BlobKey) -> Result<Vec<u8>, StorageError> {
        match fs::read(self.blob_path(key)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn sign(&self, _key: &BlobKey, _ttl: Duration) -> Option<String> {
        None
    }
}
