use thiserror::Error;

/// A provider-level failure.
///
/// The provider reports failures as free text; `message` carries that text
/// verbatim so it can be classified downstream.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("{status} {message}")]
    Api { status: u16, message: String },

    /// The request never produced a response (DNS, TLS, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded as an envelope.
    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Provider is not configured: {0}")]
    NotConfigured(String),
}

impl ProviderError {
    /// The raw message text used for classification.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}
