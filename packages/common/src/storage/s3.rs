use std::time::Duration;

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, Region};

use super::error::StorageError;
use super::key::BlobKey;
use super::traits::BlobStore;
use crate::config::S3Config;

/// Longest presign validity S3 accepts (7 days).
const MAX_PRESIGN_SECS: u64 = 7 * 24 * 60 * 60;

/// S3-compatible object store.
pub struct S3BlobStore {
    bucket: Box<Bucket>,
    max_size: u64,
}

impl S3BlobStore {
    pub fn new(config: &S3Config, max_size: u64) -> Result<Self, StorageError> {
        let region = match &config.endpoint {
            Some(endpoint) => Region::Custom {
                region: config.region.clone(),
                endpoint: endpoint.clone(),
            },
            None => config
                .region
                .parse()
                .map_err(|e| StorageError::Backend(format!("invalid region: {e}")))?,
        };

        let credentials = Credentials::new(
            Some(&config.access_key_id),
            Some(&config.secret_access_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Backend(format!("invalid credentials: {e}")))?;

        let mut bucket = Bucket::new(&config.bucket, region, credentials).map_err(backend)?;
        if config.path_style {
            bucket = bucket.with_path_style();
        }

        Ok(Self { bucket, max_size })
    }
}

fn backend(err: S3Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

fn check_status(key: &BlobKey, status: u16) -> Result<(), StorageError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(StorageError::NotFound(key.to_string())),
        other => Err(StorageError::Backend(format!(
            "unexpected status {other} for {key}"
        ))),
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
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

        let response = self
            .bucket
            .put_object_with_content_type(key.as_str(), data, content_type)
            .await
            .map_err(backend)?;
        check_status(key, response.status_code())?;

        tracing::debug!(key = %key, content_type, size = data.len(), "Stored blob in S3");
        Ok(())
    }

    async fn get(&self, key: &BlobKey) -> Result<Vec<u8>, StorageError> {
        match self.bucket.get_object(key.as_str()).await {
            Ok(response) => {
                check_status(key, response.status_code())?;
                Ok(response.bytes().to_vec())
            }
            Err(S3Error::HttpFailWithBody(404, _)) => Err(StorageError::NotFound(key.to_string())),
            Err(e) => Err(backend(e)),
        }
    }

    async fn sign(&self, key: &BlobKey, ttl: Duration) -> Option<String> {
        let expiry = ttl.as_secs().clamp(1, MAX_PRESIGN_SECS) as u32;
        match self.bucket.presign_get(key.as_str(), expiry, None).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to presign blob URL");
                None
            }
        }
    }
}
