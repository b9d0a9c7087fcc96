use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Which blob store implementation to construct.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Filesystem,
    S3,
}

/// Connection settings for an S3-compatible bucket.
#[derive(Debug, Deserialize, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2). Default: AWS.
    #[serde(default)]
    pub endpoint: Option<String>,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Use path-style addressing instead of virtual-hosted buckets.
    #[serde(default)]
    pub path_style: bool,
}

/// App-level blob storage configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageAppConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Root directory for the filesystem backend. Default: "./data/blobs".
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,
    /// Largest accepted blob in bytes. Default: 32 MiB.
    #[serde(default = "default_max_blob_size")]
    pub max_blob_size: u64,
    /// Required when `backend = "s3"`.
    #[serde(default)]
    pub s3: Option<S3Config>,
}

fn default_base_path() -> PathBuf {
    PathBuf::from("./data/blobs")
}
fn default_max_blob_size() -> u64 {
    32 * 1024 * 1024
}

impl Default for StorageAppConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            base_path: default_base_path(),
            max_blob_size: default_max_blob_size(),
            s3: None,
        }
    }
}

/// Default lifetime of a signed read URL.
pub const DEFAULT_SIGNED_URL_TTL: Duration = Duration::from_secs(60 * 60);
