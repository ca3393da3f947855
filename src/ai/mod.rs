//! AI service integration for prompt improvement and image generation
//!
//! Provides interfaces to a hosted text model (Gemini) that rewrites the
//! user's idea and a hosted image model (Hugging Face Inference) that turns
//! the improved prompt into image bytes.

pub mod gemini;
pub mod huggingface;
pub mod mime;
pub mod mock;

pub use gemini::GeminiTextClient;
pub use huggingface::HuggingFaceImageClient;
pub use mock::{MockImageGenerationClient, MockTextClient};

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Turn a rough idea into a richer prompt.
    ///
    /// Implementations send the idea prefixed with
    /// [`crate::prompts::IMPROVE_INSTRUCTION`].
    async fn improve_prompt(&self, idea: &str) -> Result<String>;
}

#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    /// Return the raw (still encoded) bytes of an image for `prompt`.
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>>;
}
