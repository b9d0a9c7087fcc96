pub mod classifier;
pub mod error;
pub mod gemini;
pub mod instruction;
pub mod mock;
pub mod models;
pub mod parser;
pub mod traits;

pub use classifier::{DEFAULT_RETRY_AFTER_MILLIS, ErrorClass, ErrorClassifier, TextErrorClassifier};
pub use error::ProviderError;
pub use gemini::{GeminiConfig, GeminiProvider};
pub use instruction::BRAND_STYLE_INSTRUCTION;
pub use mock::MockProvider;
pub use models::{GenerateContentRequest, GenerateContentResponse};
pub use parser::{GeneratedImage, ImageFormat, extract_image};
pub use traits::ImageProvider;
