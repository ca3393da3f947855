use crate::models::DEFAULT_HF_BASE_URL;
use crate::{Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Minimal client for the Hugging Face Inference API.
///
/// Models are addressed as `{base_url}/models/{model}` and answer with the
/// raw output bytes on success. Without a timeout a request waits for as
/// long as the model takes to load and run.
pub struct HuggingFaceHttpClient {
    client: Client,
    api_token: String,
    model: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl HuggingFaceHttpClient {
    pub fn new_with_client(
        api_token: String,
        model: String,
        timeout: Option<Duration>,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_token,
            model: model.trim_matches('/').to_string(),
            base_url: DEFAULT_HF_BASE_URL.to_string(),
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// POST `request` as JSON and return the response body bytes.
    ///
    /// A success status with a JSON body is the API's error/loading envelope,
    /// not model output, so it is reported as a provider error.
    pub async fn query<Req: Serialize>(&self, request: &Req) -> Result<Vec<u8>> {
        let url = format!("{}/models/{}", self.base_url, self.model);

        let mut builder = self.client.post(&url).bearer_auth(&self.api_token);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send request to Hugging Face: {}", e);
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            tracing::error!("Hugging Face API error (status {}): {}", status, error_text);
            return Err(Error::AiProvider(format!(
                "Hugging Face API error (status {}): {}",
                status, error_text
            )));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        if is_json {
            let body = response.text().await?;
            tracing::error!("Hugging Face returned JSON instead of output: {}", body);
            return Err(Error::AiProvider(format!(
                "Hugging Face returned no image: {}",
                body
            )));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(Error::AiProvider(
                "Hugging Face returned an empty body".to_string(),
            ));
        }

        Ok(bytes.to_vec())
    }
}
