use serde::Serialize;

/// Optional image that steers the generation.
#[derive(Debug, Clone)]
pub struct ReferenceImage {
    pub bytes: Vec<u8>,
    /// Declared media type; `image/jpeg` is assumed when absent.
    pub media_type: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    /// Creator identity. Empty strings are stored as anonymous.
    pub creator_email: Option<String>,
    pub reference_image: Option<ReferenceImage>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            creator_email: None,
            reference_image: None,
        }
    }

    pub fn with_creator(mut self, email: impl Into<String>) -> Self {
        self.creator_email = Some(email.into());
        self
    }

    pub fn with_reference(mut self, bytes: Vec<u8>, media_type: Option<String>) -> Self {
        self.reference_image = Some(ReferenceImage { bytes, media_type });
        self
    }
}

/// State of the (viewer, asset) pair after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    ToggledOn,
    ToggledOff,
}

impl ToggleOutcome {
    pub fn is_favorited(self) -> bool {
        matches!(self, ToggleOutcome::ToggledOn)
    }
}
