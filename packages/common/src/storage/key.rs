use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StorageError;

/// Maximum accepted key length in bytes.
const MAX_KEY_LEN: usize = 512;

/// A validated, flat object-store locator.
///
/// Keys are chosen by the writer as `{random id}_{file name}` and are opaque
/// to readers. A key never contains path separators, so it maps onto a single
/// object in every backend.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BlobKey(String);

impl BlobKey {
    /// Generate a fresh, globally unique key ending in `file_name`.
    pub fn generate(file_name: &str) -> Self {
        Self(format!("{}_{}", Uuid::new_v4(), file_name))
    }

    /// Parse and validate an externally supplied key.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        if s.is_empty() {
            return Err(StorageError::InvalidKey("key cannot be empty".into()));
        }
        if s.len() > MAX_KEY_LEN {
            return Err(StorageError::InvalidKey(format!(
                "key exceeds {MAX_KEY_LEN} bytes"
            )));
        }
        if s.chars().any(|c| c.is_ascii_control()) {
            return Err(StorageError::InvalidKey(
                "control characters are not allowed".into(),
            ));
        }
        if s.contains('/') || s.contains('\\') {
            return Err(StorageError::InvalidKey(
                "path separators are not allowed".into(),
            ));
        }
        if s.starts_with('.') {
            return Err(StorageError::InvalidKey(
                "keys cannot start with '.'".into(),
            ));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First two characters, used as the shard directory on disk.
    pub fn shard_prefix(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(2)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }

    /// Extension of the trailing file name, if any.
    pub fn extension(&self) -> Option<&str> {
        self.0
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobKey({})", self.0)
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for BlobKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BlobKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
