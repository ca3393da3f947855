use super::ImageService;
use crate::models::GeneratedImage;
use crate::{Error, Result};
use async_trait::async_trait;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct ImageProcessor {
    output_dir: PathBuf,
}

struct DecodedInfo {
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl ImageProcessor {
    /// `output_dir` is created on the first stored image, not here.
    pub fn new(output_dir: &Path) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn decode_sync(image_data: Vec<u8>) -> Result<DecodedInfo> {
        let format = image::guess_format(&image_data)?;
        let img = image::load_from_memory_with_format(&image_data, format)?;
        Ok(DecodedInfo {
            format,
            width: img.width(),
            height: img.height(),
        })
    }

    async fn decode(&self, image_data: &[u8]) -> Result<DecodedInfo> {
        tokio::task::spawn_blocking({
            let image_data = image_data.to_vec();
            move || Self::decode_sync(image_data)
        })
        .await
        .map_err(|e| Error::Invariant(format!("Image decoding task join error: {}", e)))?
    }
}

fn extension_for(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("img")
}

#[async_trait]
impl ImageService for ImageProcessor {
    async fn store_image(&self, image_data: &[u8], prompt: &str) -> Result<GeneratedImage> {
        let info = self.decode(image_data).await.map_err(|e| {
            tracing::warn!("Image bytes could not be decoded: {}", e);
            e
        })?;

        let extension = extension_for(info.format);
        let filename = format!("image_{}.{}", Uuid::new_v4(), extension);
        let path = self.output_dir.join(filename);

        tokio::fs::create_dir_all(&self.output_dir).await?;
        tokio::fs::write(&path, image_data).await?;
        tracing::info!(
            "Saved {}x{} {} image to {}",
            info.width,
            info.height,
            extension,
            path.display()
        );

        Ok(GeneratedImage {
            prompt: prompt.to_string(),
            format: extension.to_string(),
            width: info.width,
            height: info.height,
            path,
        })
    }
}
