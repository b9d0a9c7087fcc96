use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::models::{GenerateContentResponse, InlineData};

/// Image container format, inferred from the provider's media type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Webp,
}

impl ImageFormat {
    /// Map a declared media type. Unknown or absent types default to PNG.
    pub fn from_mime(mime_type: Option<&str>) -> Self {
        match mime_type {
            Some(m) if m.contains("jpeg") => Self::Jpeg,
            Some(m) if m.contains("webp") => Self::Webp,
            _ => Self::Png,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => ".png",
            Self::Jpeg => ".jpg",
            Self::Webp => ".webp",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    /// Fixed object name for generated output, e.g. `generated_image.jpg`.
    pub fn file_name(self) -> String {
        format!("generated_image{}", self.extension())
    }
}

/// The single binary payload extracted from an envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    /// Media type as declared by the provider, or the format default.
    pub media_type: String,
}

/// Extract the first inline image of the first candidate.
///
/// Any missing or empty level yields `None`; this never fails. Parts are
/// scanned in order and the first one carrying decodable, non-empty inline
/// data wins.
pub fn extract_image(envelope: &GenerateContentResponse) -> Option<GeneratedImage> {
    let candidate = envelope.candidates.as_deref()?.first()?;
    let parts = candidate.content.as_ref()?.parts.as_deref()?;
    parts
        .iter()
        .find_map(|part| part.inline_data.as_ref().and_then(decode_inline))
}

fn decode_inline(inline: &InlineData) -> Option<GeneratedImage> {
    let data = inline.data.as_deref().filter(|d| !d.is_empty())?;
    let bytes = match BASE64.decode(data) {
        Ok(bytes) if !bytes.is_empty() => bytes,
        Ok(_) => return None,
        Err(e) => {
            tracing::warn!(error = %e, "Skipping part with undecodable inline data");
            return None;
        }
    };
    let format = ImageFormat::from_mime(inline.mime_type.as_deref());
    let media_type = inline
        .mime_type
        .clone()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format.content_type().to_string());

    Some(GeneratedImage {
        bytes,
        format,
        media_type,
    })
}

/// Describe which level of the envelope is missing, for diagnostics.
pub fn describe_absence(envelope: &GenerateContentResponse) -> &'static str {
    let Some(candidates) = envelope.candidates.as_deref() else {
        return "no candidates";
    };
    let Some(first) = candidates.first() else {
        return "empty candidate list";
    };
    let Some(content) = first.content.as_ref() else {
        return "candidate has no content";
    };
    match content.parts.as_deref() {
        None | Some([]) => "content has no parts",
        Some(_) => "no part carries inline image data",
    }
}
