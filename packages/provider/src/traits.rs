use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::{GenerateContentRequest, GenerateContentResponse};

/// A generative-image backend.
///
/// One call, one response. Implementations do not retry.
#[async_trait]
pub trait ImageProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError>;
}
