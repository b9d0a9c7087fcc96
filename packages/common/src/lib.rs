pub mod config;
pub mod storage;

pub use config::{S3Config, StorageAppConfig, StorageBackend};
pub use storage::{BlobKey, BlobStore, StorageError};
