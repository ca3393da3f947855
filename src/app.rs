//! Application orchestration for the idea → prompt → image flow.

use crate::ai::{
    GeminiTextClient, HuggingFaceImageClient, ImageGenerationService, MockImageGenerationClient,
    MockTextClient, TextGenerationService,
};
use crate::image::{ImageProcessor, ImageService};
use crate::models::{Config, GeneratedImage, Session};
use crate::ui::{self, Banner, Command};
use crate::{Error, Result};
use chrono::Local;
use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Holds the two model clients, the image store, and the session state.
pub struct App {
    text: Box<dyn TextGenerationService>,
    image_gen: Box<dyn ImageGenerationService>,
    image: Box<dyn ImageService>,
    session: Session,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub text: Box<dyn TextGenerationService>,
    pub image_gen: Box<dyn ImageGenerationService>,
    pub image: Box<dyn ImageService>,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices) -> Self {
        Self {
            text: services.text,
            image_gen: services.image_gen,
            image: services.image,
            session: Session::new(),
        }
    }

    /// Construct an app talking to the hosted Gemini and Hugging Face models.
    pub fn new(config: &Config) -> Result<Self> {
        let (google_api_key, hf_api_token) = config.secrets()?;

        // One connection pool shared by both providers.
        let http_client = reqwest::Client::new();

        info!("Text provider: Gemini (model: {})", config.text_model);
        let text = GeminiTextClient::new_with_client(
            google_api_key.to_string(),
            config.text_model.clone(),
            config.text_timeout,
            http_client.clone(),
        )
        .with_base_url(config.gemini_base_url.clone());

        info!("Image provider: Hugging Face (model: {})", config.image_model);
        let image_gen = HuggingFaceImageClient::new_with_client(
            hf_api_token.to_string(),
            config.image_model.clone(),
            config.image_timeout,
            http_client,
        )
        .with_base_url(config.hf_base_url.clone());

        let image = ImageProcessor::new(&Self::session_dir(&config.output_dir));

        Ok(Self::with_services(AppServices {
            text: Box::new(text),
            image_gen: Box::new(image_gen),
            image: Box::new(image),
        }))
    }

    /// Construct an app backed by in-memory mocks; no secrets needed.
    pub fn offline(config: &Config) -> Self {
        info!("Offline mode enabled, using mock providers");
        let image = ImageProcessor::new(&Self::session_dir(&config.output_dir));

        Self::with_services(AppServices {
            text: Box::new(MockTextClient::new()),
            image_gen: Box::new(MockImageGenerationClient::new()),
            image: Box::new(image),
        })
    }

    fn session_dir(output_root: &Path) -> PathBuf {
        let date = Local::now().format("%Y-%m-%d").to_string();
        output_root.join(format!("{}_{}", date, Uuid::new_v4()))
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Send the idea to the text model and remember the improved prompt.
    ///
    /// On failure the session keeps whatever it held before the call.
    pub async fn improve_idea(&mut self, idea: &str) -> Result<String> {
        if idea.trim().is_empty() {
            return Err(Error::EmptyIdea);
        }

        info!("Improving idea ({} chars)", idea.chars().count());
        let improved = self.text.improve_prompt(idea).await.map_err(|e| {
            error!("Prompt improvement failed: {}", e);
            e
        })?;
        info!("Improved prompt ({} chars): {}", improved.len(), improved);

        self.session
            .record_improvement(idea.to_string(), improved.clone());
        Ok(improved)
    }

    /// Generate, decode, and store an image for the current improved prompt.
    pub async fn generate_image(&self) -> Result<GeneratedImage> {
        let prompt = self
            .session
            .improved_prompt()
            .ok_or(Error::MissingImprovedPrompt)?;

        let image_data = self.image_gen.generate_image(prompt).await.map_err(|e| {
            error!("Image generation failed: {}", e);
            e
        })?;
        info!("Generated image ({} bytes)", image_data.len());

        self.image.store_image(&image_data, prompt).await
    }

    /// Run the interactive session until `/quit` or end of input.
    ///
    /// Failures of either model call are shown as banners; only I/O errors on
    /// the terminal itself end the loop early.
    pub async fn run_interactive<R, W>(&mut self, mut input: R, output: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(output, "{}", ui::TITLE)?;
        writeln!(output, "{}", Banner::info(ui::GREETING))?;
        writeln!(output, "{}", ui::IDEA_LABEL)?;
        writeln!(output, "{}", Banner::warning(ui::NEEDS_PROMPT_WARNING))?;

        let mut buf = Vec::new();
        loop {
            write!(output, "> ")?;
            output.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                writeln!(output)?;
                break;
            }

            // Terminals with a non-UTF-8 locale still get their line through.
            let line = String::from_utf8_lossy(&buf);
            if let Cow::Owned(_) = line {
                warn!("Input line was not valid UTF-8; invalid bytes replaced");
            }

            match Command::parse(&line) {
                Command::Improve(idea) => self.handle_improve(&idea, output).await?,
                Command::GenerateImage => self.handle_generate_image(output).await?,
                Command::ShowPrompt => match self.session.improved_prompt() {
                    Some(prompt) => writeln!(output, "{}", ui::improved_prompt_line(prompt))?,
                    None => writeln!(output, "{}", Banner::warning(ui::NEEDS_PROMPT_WARNING))?,
                },
                Command::Help => writeln!(output, "{}", ui::HELP)?,
                Command::Quit => break,
                Command::Unknown(word) => writeln!(
                    output,
                    "{}",
                    Banner::warning(format!("Comando desconocido: {}. Usa /help.", word))
                )?,
                Command::Empty => {}
            }
        }

        info!("Session finished");
        Ok(())
    }

    async fn handle_improve<W: Write>(&mut self, idea: &str, output: &mut W) -> Result<()> {
        writeln!(output, "{}", Banner::info(ui::TEXT_PROGRESS))?;
        output.flush()?;

        match self.improve_idea(idea).await {
            Ok(prompt) => {
                writeln!(output, "{}", Banner::success("Respuesta generada."))?;
                writeln!(output, "{}", ui::IMAGE_SECTION)?;
                writeln!(output, "{}", ui::improved_prompt_line(&prompt))?;
                writeln!(output, "{}", Banner::info("Usa /image para generar la imagen."))?;
            }
            Err(Error::EmptyIdea) => {
                warn!("Ignoring empty idea");
                writeln!(output, "{}", Banner::warning(ui::IDEA_LABEL))?;
            }
            Err(e) => {
                writeln!(output, "{}", Banner::text_error(&e))?;
                if self.session.improved_prompt().is_none() {
                    writeln!(output, "{}", Banner::warning(ui::NEEDS_PROMPT_WARNING))?;
                }
            }
        }
        Ok(())
    }

    async fn handle_generate_image<W: Write>(&self, output: &mut W) -> Result<()> {
        if self.session.improved_prompt().is_none() {
            writeln!(output, "{}", Banner::warning(ui::NEEDS_PROMPT_WARNING))?;
            return Ok(());
        }

        writeln!(output, "{}", Banner::info(ui::IMAGE_PROGRESS))?;
        output.flush()?;

        match self.generate_image().await {
            Ok(image) => {
                writeln!(output, "{}", Banner::success(image.caption()))?;
                writeln!(
                    output,
                    "{}",
                    Banner::info(format!(
                        "{} ({}x{}, {})",
                        image.path.display(),
                        image.width,
                        image.height,
                        image.format
                    ))
                )?;
            }
            Err(e) => writeln!(output, "{}", Banner::image_error(&e))?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{App, AppServices};
    use crate::ai::{MockImageGenerationClient, MockTextClient};
    use crate::image::ImageProcessor;
    use crate::models::Session;
    use crate::{prompts, Error};
    use tempfile::TempDir;

    const TEST_PROMPT: &str = "Un faro bajo una aurora violeta, estilo óleo";

    fn build_test_app(
        dir: &TempDir,
        text: MockTextClient,
        image_gen: MockImageGenerationClient,
    ) -> App {
        App::with_services(AppServices {
            text: Box::new(text),
            image_gen: Box::new(image_gen),
            image: Box::new(ImageProcessor::new(dir.path())),
        })
    }

    async fn run_script(app: &mut App, script: &str) -> String {
        let mut output = Vec::new();
        app.run_interactive(script.as_bytes(), &mut output)
            .await
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn test_improve_idea_stores_prompt() {
        let dir = TempDir::new().unwrap();
        let text = MockTextClient::new().with_prompt_response(TEST_PROMPT.to_string());
        let mut app = build_test_app(&dir, text.clone(), MockImageGenerationClient::new());

        let prompt = app.improve_idea("un faro").await.unwrap();

        assert_eq!(prompt, TEST_PROMPT);
        assert_eq!(app.session().idea.as_deref(), Some("un faro"));
        assert_eq!(app.session().improved_prompt(), Some(TEST_PROMPT));
        assert_eq!(
            text.received_inputs(),
            vec![prompts::build_improvement_input("un faro")]
        );
    }

    #[tokio::test]
    async fn test_empty_idea_makes_no_call() {
        let dir = TempDir::new().unwrap();
        let text = MockTextClient::new();
        let mut app = build_test_app(&dir, text.clone(), MockImageGenerationClient::new());

        let err = app.improve_idea("   ").await.unwrap_err();

        assert!(matches!(err, Error::EmptyIdea));
        assert_eq!(text.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_improvement_leaves_session_unchanged() {
        let dir = TempDir::new().unwrap();
        let text = MockTextClient::new().with_prompt_response(TEST_PROMPT.to_string());
        let mut app = build_test_app(&dir, text.clone(), MockImageGenerationClient::new());

        app.improve_idea("un faro").await.unwrap();
        let before: Session = app.session().clone();

        text.set_failure(Some("quota exceeded"));
        let err = app.improve_idea("otra idea").await.unwrap_err();

        assert!(matches!(err, Error::AiProvider(_)));
        assert_eq!(app.session(), &before);
    }

    #[tokio::test]
    async fn test_generate_image_requires_improved_prompt() {
        let dir = TempDir::new().unwrap();
        let image_gen = MockImageGenerationClient::new();
        let app = build_test_app(&dir, MockTextClient::new(), image_gen.clone());

        let err = app.generate_image().await.unwrap_err();

        assert!(matches!(err, Error::MissingImprovedPrompt));
        assert_eq!(image_gen.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_image_sends_improved_prompt_verbatim() {
        let dir = TempDir::new().unwrap();
        let text = MockTextClient::new().with_prompt_response(TEST_PROMPT.to_string());
        let image_gen = MockImageGenerationClient::new();
        let mut app = build_test_app(&dir, text, image_gen.clone());

        app.improve_idea("un faro").await.unwrap();
        let image = app.generate_image().await.unwrap();

        assert_eq!(image_gen.received_prompts(), vec![TEST_PROMPT.to_string()]);
        assert_eq!(image.prompt, TEST_PROMPT);
        assert!(image.path.exists());
    }

    #[tokio::test]
    async fn test_undecodable_image_is_an_error() {
        let dir = TempDir::new().unwrap();
        let image_gen = MockImageGenerationClient::new().with_image_response(vec![1, 2, 3]);
        let mut app = build_test_app(&dir, MockTextClient::new(), image_gen);

        app.improve_idea("un faro").await.unwrap();
        let err = app.generate_image().await.unwrap_err();

        assert!(matches!(err, Error::Image(_)));
    }

    #[tokio::test]
    async fn test_interactive_image_before_prompt_warns() {
        let dir = TempDir::new().unwrap();
        let image_gen = MockImageGenerationClient::new();
        let mut app = build_test_app(&dir, MockTextClient::new(), image_gen.clone());

        let transcript = run_script(&mut app, "/image\n/quit\n").await;

        assert_eq!(
            transcript
                .matches("Genera una respuesta para habilitar")
                .count(),
            2
        );
        assert!(!transcript.contains("Imagen generada"));
        assert_eq!(image_gen.get_call_count(), 0);
    }

    #[tokio::test]
    async fn test_interactive_full_flow() {
        let dir = TempDir::new().unwrap();
        let text = MockTextClient::new().with_prompt_response(TEST_PROMPT.to_string());
        let mut app = build_test_app(&dir, text, MockImageGenerationClient::new());

        let transcript = run_script(&mut app, "un faro\n/prompt\n/image\n").await;

        assert!(transcript.contains(&format!("Prompt mejorado: '{}'", TEST_PROMPT)));
        assert!(transcript.contains(&format!(
            "Imagen generada para el prompt: '{}'",
            TEST_PROMPT
        )));
        assert!(transcript.contains("4x4, png"));
    }

    #[tokio::test]
    async fn test_interactive_errors_do_not_end_session() {
        let dir = TempDir::new().unwrap();
        let text = MockTextClient::new().with_failure("network down");
        let mut app = build_test_app(&dir, text.clone(), MockImageGenerationClient::new());

        let transcript = run_script(&mut app, "idea uno\nidea dos\n/help\n").await;

        assert_eq!(
            transcript
                .matches("Error al generar la respuesta: AI provider error: network down")
                .count(),
            2
        );
        assert!(transcript.contains("Comandos:"));
        assert_eq!(text.get_call_count(), 2);
    }

    #[tokio::test]
    async fn test_interactive_image_error_is_reported() {
        let dir = TempDir::new().unwrap();
        let image_gen = MockImageGenerationClient::new().with_failure("model loading");
        let mut app = build_test_app(&dir, MockTextClient::new(), image_gen);

        let transcript = run_script(&mut app, "un faro\n/image\n/prompt\n").await;

        assert!(transcript.contains("Error al generar la imagen: AI provider error: model loading"));
        // The improved prompt survives a failed image call.
        assert_eq!(transcript.matches("Prompt mejorado:").count(), 2);
    }

    #[tokio::test]
    async fn test_interactive_survives_non_utf8_line() {
        let dir = TempDir::new().unwrap();
        let text = MockTextClient::new();
        let mut app = build_test_app(&dir, text.clone(), MockImageGenerationClient::new());

        let mut output = Vec::new();
        app.run_interactive(&b"dise\xF1o\nun faro\n"[..], &mut output)
            .await
            .unwrap();

        let inputs = text.received_inputs();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0], prompts::build_improvement_input("dise\u{FFFD}o"));
        assert_eq!(inputs[1], prompts::build_improvement_input("un faro"));
        assert_eq!(app.session().idea.as_deref(), Some("un faro"));
    }

    #[tokio::test]
    async fn test_offline_app_creates_no_directory_without_image() {
        let dir = TempDir::new().unwrap();
        let config = crate::models::Config {
            output_dir: dir.path().join("output"),
            ..Default::default()
        };
        let mut app = App::offline(&config);

        app.improve_idea("un faro").await.unwrap();
        assert!(!dir.path().join("output").exists());

        let image = app.generate_image().await.unwrap();
        assert!(image.path.starts_with(dir.path().join("output")));
    }

    #[tokio::test]
    async fn test_interactive_unknown_command() {
        let dir = TempDir::new().unwrap();
        let mut app = build_test_app(
            &dir,
            MockTextClient::new(),
            MockImageGenerationClient::new(),
        );

        let transcript = run_script(&mut app, "/draw\n").await;
        assert!(transcript.contains("Comando desconocido: /draw"));
    }
}
