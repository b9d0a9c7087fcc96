use async_trait::async_trait;

use crate::error::ProviderError;
use crate::models::{Candidate, Content, GenerateContentRequest, GenerateContentResponse, Part};
use crate::traits::ImageProvider;

/// A 1x1 transparent PNG, base64 encoded.
const PLACEHOLDER_PNG: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Offline provider that answers every request with a placeholder image.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProvider;

#[async_trait]
impl ImageProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        tracing::info!(
            parts = request.user_parts().len(),
            "Mock provider returning placeholder image"
        );
        Ok(GenerateContentResponse {
            candidates: Some(vec![Candidate {
                content: Some(Content {
                    role: Some("model".into()),
                    parts: Some(vec![Part::inline("image/png", PLACEHOLDER_PNG)]),
                }),
                finish_reason: Some("STOP".into()),
            }]),
        })
    }
}
