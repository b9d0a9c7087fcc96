use std::time::Duration;

use async_trait::async_trait;

use super::error::StorageError;
use super::key::BlobKey;

/// Keyed binary object storage.
///
/// Writers pick the key; the store never derives one. A successful `put`
/// means the object is durably readable under that key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `key` with the given media type.
    async fn put(
        &self,
        key: &BlobKey,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Retrieve all bytes stored under `key`.
    async fn get(&self, key: &BlobKey) -> Result<Vec<u8>, StorageError>;

    /// Produce a time-limited read URL, or `None` if this backend cannot sign.
    async fn sign(&self, key: &BlobKey, ttl: Duration) -> Option<String>;
}
