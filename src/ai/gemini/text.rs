use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, Part};
use crate::ai::TextGenerationService;
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub struct GeminiTextClient {
    http: GeminiHttpClient,
}

impl GeminiTextClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, None, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Option<Duration>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, timeout, client),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl TextGenerationService for GeminiTextClient {
    async fn improve_prompt(&self, idea: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part::text(prompts::build_improvement_input(idea))],
            }],
        };

        tracing::debug!("Requesting prompt improvement from {}", self.http.model());
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        response.first_text().ok_or_else(|| {
            let reason = response
                .empty_reason()
                .unwrap_or_else(|| "no candidates".to_string());
            tracing::warn!("Gemini returned no text: {}", reason);
            Error::AiProvider(format!("No text in Gemini response: {}", reason))
        })
    }
}
