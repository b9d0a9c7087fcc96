use std::sync::LazyLock;

use regex::Regex;

/// Delay reported when a quota failure names no retry time.
pub const DEFAULT_RETRY_AFTER_MILLIS: u64 = 60_000;

/// Substrings that mark a quota or rate-limit failure. Case-sensitive.
const QUOTA_MARKERS: &[&str] = &["429", "quota", "Quota exceeded"];

static RETRY_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Please retry in ([\d.]+)s").expect("retry pattern is a valid regex")
});

/// Outcome of classifying a provider failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient quota condition; the caller may retry after the delay.
    QuotaExceeded { retry_after_millis: u64 },
    /// Anything else. Not retryable.
    Other,
}

/// Maps raw provider failure text to an [`ErrorClass`].
pub trait ErrorClassifier: Send + Sync {
    fn classify(&self, message: &str) -> ErrorClass;
}

/// Classifies by scanning the provider's error text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextErrorClassifier;

impl TextErrorClassifier {
    /// Seconds named in a "Please retry in Ns" hint, converted to millis.
    fn retry_after_millis(message: &str) -> Option<u64> {
        let captures = RETRY_IN.captures(message)?;
        let seconds: f64 = captures.get(1)?.as_str().parse().ok()?;
        if !seconds.is_finite() || seconds < 0.0 {
            return None;
        }
        Some((seconds * 1000.0) as u64)
    }
}

impl ErrorClassifier for TextErrorClassifier {
    fn classify(&self, message: &str) -> ErrorClass {
        if !QUOTA_MARKERS.iter().any(|marker| message.contains(marker)) {
            return ErrorClass::Other;
        }
        ErrorClass::QuotaExceeded {
            retry_after_millis: Self::retry_after_millis(message)
                .unwrap_or(DEFAULT_RETRY_AFTER_MILLIS),
        }
    }
}
