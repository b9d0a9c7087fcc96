use common::StorageError;
use provider::ErrorClass;
use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

/// Structured error description handed to whatever renders failures.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `QUOTA_EXCEEDED`, `GENERATION_FAILED`, `STORAGE_FAILED`, `NOT_FOUND`,
    /// `CANCELLED`, `INTERNAL_ERROR`.
    pub code: &'static str,
    /// Human-readable error description.
    pub message: String,
    /// Present only for `QUOTA_EXCEEDED`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_millis: Option<u64>,
}

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected before any external call.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Provider quota or rate limit hit. Never retried internally.
    #[error("Quota exceeded: {message}")]
    QuotaExceeded {
        retry_after_millis: u64,
        message: String,
    },

    /// Provider returned no usable image or failed for a non-quota reason.
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// The blob write did not complete; no metadata was recorded.
    #[error("Storage failed: {0}")]
    StorageFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller cancelled before any write happened.
    #[error("Cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Map a classified provider failure.
    pub fn from_provider(class: ErrorClass, message: String) -> Self {
        match class {
            ErrorClass::QuotaExceeded { retry_after_millis } => AppError::QuotaExceeded {
                retry_after_millis,
                message,
            },
            ErrorClass::Other => AppError::GenerationFailed(message),
        }
    }

    pub fn body(&self) -> ErrorBody {
        match self {
            AppError::Validation(msg) => ErrorBody {
                code: "VALIDATION_ERROR",
                message: msg.clone(),
                retry_after_millis: None,
            },
            AppError::QuotaExceeded {
                retry_after_millis, ..
            } => ErrorBody {
                code: "QUOTA_EXCEEDED",
                message: format!(
                    "The image service is busy. Try again in {} seconds",
                    retry_after_millis.div_ceil(1000)
                ),
                retry_after_millis: Some(*retry_after_millis),
            },
            AppError::GenerationFailed(msg) => ErrorBody {
                code: "GENERATION_FAILED",
                message: format!("Image generation failed: {msg}"),
                retry_after_millis: None,
            },
            AppError::StorageFailed(_) => ErrorBody {
                code: "STORAGE_FAILED",
                message: "The generated image could not be saved".into(),
                retry_after_millis: None,
            },
            AppError::NotFound(msg) => ErrorBody {
                code: "NOT_FOUND",
                message: msg.clone(),
                retry_after_millis: None,
            },
            AppError::Cancelled => ErrorBody {
                code: "CANCELLED",
                message: "The request was cancelled".into(),
                retry_after_millis: None,
            },
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorBody {
                    code: "INTERNAL_ERROR",
                    message: "An unexpected error occurred".into(),
                    retry_after_millis: None,
                }
            }
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Blob '{key}' not found")),
            StorageError::InvalidKey(msg) => AppError::Validation(msg),
            other => AppError::StorageFailed(other.to_string()),
        }
    }
}
