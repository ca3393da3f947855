use super::{ImageGenerationService, TextGenerationService};
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockTextClient {
    prompt_responses: Arc<Mutex<Vec<String>>>,
    received_inputs: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockTextClient {
    pub fn new() -> Self {
        Self {
            prompt_responses: Arc::new(Mutex::new(Vec::new())),
            received_inputs: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_prompt_response(self, response: String) -> Self {
        self.prompt_responses.lock().unwrap().push(response);
        self
    }

    /// Make every following call fail with an AI provider error.
    pub fn with_failure(self, message: &str) -> Self {
        self.set_failure(Some(message));
        self
    }

    pub fn set_failure(&self, message: Option<&str>) {
        *self.failure.lock().unwrap() = message.map(str::to_string);
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Full model inputs (instruction included) in call order.
    pub fn received_inputs(&self) -> Vec<String> {
        self.received_inputs.lock().unwrap().clone()
    }
}

impl Default for MockTextClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerationService for MockTextClient {
    async fn improve_prompt(&self, idea: &str) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.received_inputs
            .lock()
            .unwrap()
            .push(prompts::build_improvement_input(idea));

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::AiProvider(message));
        }

        let responses = self.prompt_responses.lock().unwrap();
        if responses.is_empty() {
            Ok(format!(
                "{}, con colores vivos y un estilo de acuarela",
                idea.trim()
            ))
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }
}

#[derive(Clone)]
pub struct MockImageGenerationClient {
    image_responses: Arc<Mutex<Vec<Vec<u8>>>>,
    received_prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            image_responses: Arc::new(Mutex::new(Vec::new())),
            received_prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            failure: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_image_response(self, response: Vec<u8>) -> Self {
        self.image_responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(self, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some(message.to_string());
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn received_prompts(&self) -> Vec<String> {
        self.received_prompts.lock().unwrap().clone()
    }

    /// A small solid-colour PNG, enough for a decoder to accept.
    pub fn placeholder_png() -> Result<Vec<u8>> {
        let img = RgbImage::from_pixel(4, 4, Rgb([224, 96, 32]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        let index = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count - 1
        };

        self.received_prompts
            .lock()
            .unwrap()
            .push(prompt.to_string());

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::AiProvider(message));
        }

        let response = {
            let responses = self.image_responses.lock().unwrap();
            if responses.is_empty() {
                None
            } else {
                Some(responses[index % responses.len()].clone())
            }
        };

        match response {
            Some(bytes) => Ok(bytes),
            None => Self::placeholder_png(),
        }
    }
}
