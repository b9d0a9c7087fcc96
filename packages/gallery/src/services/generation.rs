use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use common::{BlobKey, BlobStore};
use provider::models::Part;
use provider::parser::describe_absence;
use provider::{
    BRAND_STYLE_INSTRUCTION, ErrorClass, ErrorClassifier, GenerateContentRequest, ImageProvider,
    extract_image,
};
use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use crate::error::AppError;
use crate::models::generation::{GenerationRequest, ReferenceImage};
use crate::repository::AssetRepository;

/// Media type assumed for a reference image that declares none.
pub const DEFAULT_REFERENCE_MEDIA_TYPE: &str = "image/jpeg";

/// Immutable request-shaping values fixed at construction.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub system_instruction: String,
    pub aspect_ratio: String,
}

impl GenerationSettings {
    /// Settings carrying the brand-style instruction.
    pub fn branded(model: impl Into<String>, aspect_ratio: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system_instruction: BRAND_STYLE_INSTRUCTION.to_string(),
            aspect_ratio: aspect_ratio.into(),
        }
    }
}

/// Turns a prompt into a stored asset: one provider call, one blob write,
/// one metadata row.
pub struct GenerationOrchestrator {
    provider: Arc<dyn ImageProvider>,
    classifier: Arc<dyn ErrorClassifier>,
    blob_store: Arc<dyn BlobStore>,
    db: DatabaseConnection,
    settings: GenerationSettings,
}

impl GenerationOrchestrator {
    pub fn new(
        provider: Arc<dyn ImageProvider>,
        classifier: Arc<dyn ErrorClassifier>,
        blob_store: Arc<dyn BlobStore>,
        db: DatabaseConnection,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            provider,
            classifier,
            blob_store,
            db,
            settings,
        }
    }

    /// Generate an image and return its blob key.
    ///
    /// Cancellation is honored until the provider answers. Once a payload is
    /// in hand the blob write and the metadata insert run to completion.
    #[instrument(
        skip(self, request, cancel),
        fields(provider = self.provider.name(), has_reference = request.reference_image.is_some())
    )]
    pub async fn generate(
        &self,
        request: GenerationRequest,
        cancel: &CancellationToken,
    ) -> Result<String, AppError> {
        let prompt = request.prompt.trim();
        if prompt.is_empty() {
            return Err(AppError::Validation("Prompt must not be empty".into()));
        }
        let reference = request
            .reference_image
            .as_ref()
            .map(reference_part)
            .transpose()?;
        let creator_email = request
            .creator_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty());

        let provider_request = self.build_request(prompt, reference);

        if cancel.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("Generation cancelled while waiting for provider");
                return Err(AppError::Cancelled);
            }
            outcome = self.provider.generate_content(&provider_request) => outcome,
        };

        let envelope = match outcome {
            Ok(envelope) => envelope,
            Err(e) => {
                let message = e.message();
                let class = self.classifier.classify(&message);
                match class {
                    ErrorClass::QuotaExceeded { retry_after_millis } => {
                        warn!(retry_after_millis, "Provider quota exceeded: {}", message)
                    }
                    ErrorClass::Other => error!("Provider call failed: {}", message),
                }
                return Err(AppError::from_provider(class, message));
            }
        };

        let Some(image) = extract_image(&envelope) else {
            warn!(
                reason = describe_absence(&envelope),
                "Provider response carried no image"
            );
            return Err(AppError::GenerationFailed("no image data".into()));
        };

        let key = BlobKey::generate(&image.format.file_name());
        self.blob_store
            .put(&key, &image.bytes, &image.media_type)
            .await
            .map_err(|e| {
                error!(blob_key = %key, "Blob write failed: {}", e);
                AppError::StorageFailed(e.to_string())
            })?;
        info!(blob_key = %key, size = image.bytes.len(), "Stored generated image");

        let repo = AssetRepository::new(&self.db);
        if let Err(e) = repo.create_asset(key.as_str(), prompt, creator_email).await {
            warn!(blob_key = %key, "Asset metadata write failed, blob is orphaned: {}", e);
            return Err(e.into());
        }
        info!(blob_key = %key, "Recorded asset");

        Ok(key.into_string())
    }

    fn build_request(&self, prompt: &str, reference: Option<Part>) -> GenerateContentRequest {
        let mut parts = vec![Part::text(prompt)];
        parts.extend(reference);
        GenerateContentRequest::image_only(
            &self.settings.model,
            &self.settings.system_instruction,
            parts,
            &self.settings.aspect_ratio,
        )
    }
}

fn reference_part(image: &ReferenceImage) -> Result<Part, AppError> {
    if image.bytes.is_empty() {
        return Err(AppError::Validation(
            "Reference image must not be empty".into(),
        ));
    }
    let media_type = image
        .media_type
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_REFERENCE_MEDIA_TYPE);
    Ok(Part::inline(media_type, BASE64.encode(&image.bytes)))
}
