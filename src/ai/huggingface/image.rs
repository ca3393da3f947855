use super::client::HuggingFaceHttpClient;
use crate::ai::mime::detect_image_mime;
use crate::ai::ImageGenerationService;
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct TextToImageRequest<'a> {
    inputs: &'a str,
}

pub struct HuggingFaceImageClient {
    http: HuggingFaceHttpClient,
}

impl HuggingFaceImageClient {
    pub fn new(api_token: String, model: String) -> Self {
        Self::new_with_client(api_token, model, None, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_token: String,
        model: String,
        timeout: Option<Duration>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: HuggingFaceHttpClient::new_with_client(api_token, model, timeout, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl ImageGenerationService for HuggingFaceImageClient {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        tracing::debug!("Requesting image from {}", self.http.model());

        let bytes = self
            .http
            .query(&TextToImageRequest { inputs: prompt })
            .await?;

        tracing::debug!(
            "Hugging Face returned {} bytes ({})",
            bytes.len(),
            detect_image_mime(&bytes)
        );

        Ok(bytes)
    }
}
