//! Data models and structures
//!
//! Defines the per-session state, the decoded image handed to the display
//! layer, and the environment-driven configuration.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_TEXT_MODEL: &str = "gemini-pro";
pub const DEFAULT_IMAGE_MODEL: &str = "black-forest-labs/FLUX.1-dev";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Values that live for one interactive session and are never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub idea: Option<String>,
    pub improved_prompt: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful text-generation result.
    pub fn record_improvement(&mut self, idea: String, improved_prompt: String) {
        self.idea = Some(idea);
        self.improved_prompt = Some(improved_prompt);
    }

    pub fn improved_prompt(&self) -> Option<&str> {
        self.improved_prompt.as_deref()
    }
}

/// A decoded image that has been written to disk for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub prompt: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
    pub path: PathBuf,
}

impl GeneratedImage {
    pub fn caption(&self) -> String {
        format!("Imagen generada para el prompt: '{}'", self.prompt)
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: Option<String>,
    pub hf_api_token: Option<String>,
    pub text_model: String,
    pub image_model: String,
    pub gemini_base_url: String,
    pub hf_base_url: String,
    /// Per-request timeouts; `None` waits for the provider indefinitely.
    pub text_timeout: Option<Duration>,
    pub image_timeout: Option<Duration>,
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_api_key: None,
            hf_api_token: None,
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            hf_base_url: DEFAULT_HF_BASE_URL.to_string(),
            text_timeout: None,
            image_timeout: None,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first
    /// when one exists.
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration after populating the environment from `path`.
    pub fn from_env_file(path: &std::path::Path) -> crate::Result<Self> {
        dotenvy::from_path(path)?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            google_api_key: non_empty("GOOGLE_API_KEY"),
            hf_api_token: non_empty("HF_API_TOKEN"),
            text_model: non_empty("TEXT_MODEL").unwrap_or(defaults.text_model),
            image_model: non_empty("IMAGE_MODEL").unwrap_or(defaults.image_model),
            gemini_base_url: non_empty("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            hf_base_url: non_empty("HF_BASE_URL").unwrap_or(defaults.hf_base_url),
            text_timeout: parse_secs("TEXT_TIMEOUT_SECS", non_empty("TEXT_TIMEOUT_SECS"))?,
            image_timeout: parse_secs("IMAGE_TIMEOUT_SECS", non_empty("IMAGE_TIMEOUT_SECS"))?,
            output_dir: non_empty("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        })
    }

    /// The text API key and the image bearer token, both required once real
    /// providers are in use.
    pub fn secrets(&self) -> crate::Result<(&str, &str)> {
        let google_api_key = self
            .google_api_key
            .as_deref()
            .ok_or_else(|| crate::Error::Config("GOOGLE_API_KEY not set".to_string()))?;
        let hf_api_token = self
            .hf_api_token
            .as_deref()
            .ok_or_else(|| crate::Error::Config("HF_API_TOKEN not set".to_string()))?;
        Ok((google_api_key, hf_api_token))
    }
}

fn parse_secs(key: &str, value: Option<String>) -> crate::Result<Option<Duration>> {
    value
        .map(|v| {
            v.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| {
                    crate::Error::Config(format!(
                        "{} must be a whole number of seconds, got '{}'",
                        key, v
                    ))
                })
        })
        .transpose()
}
