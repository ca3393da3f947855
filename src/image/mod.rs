//! Image decoding and storage
//!
//! Validates the bytes returned by the image model and writes them to the
//! session output directory so they can be shown to the user.

pub mod processor;

pub use processor::ImageProcessor;

use crate::models::GeneratedImage;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ImageService: Send + Sync {
    /// Decode `image_data` and persist it, returning what should be displayed.
    async fn store_image(&self, image_data: &[u8], prompt: &str) -> Result<GeneratedImage>;
}
