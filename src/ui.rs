//! Terminal surface: command parsing and status banners.

use std::fmt;

pub const TITLE: &str = "🎨 JDM-DESIGN - Estudio de Arte Textual a Imagen";
pub const GREETING: &str = "¡Hola! Comienza aquí ↓";
pub const IDEA_LABEL: &str = "Describe lo que quieres:";
pub const IMAGE_SECTION: &str = "🎨 Generación de Imágenes";
pub const NEEDS_PROMPT_WARNING: &str =
    "Genera una respuesta para habilitar la generación de imágenes.";
pub const IMAGE_PROGRESS: &str =
    "🖌️ Transformando tus palabras en arte... ⚙️ Modelo iniciado. 🙆‍♀️ Estírate mientras tanto...";
pub const TEXT_PROGRESS: &str = "🤖 Mejorando tu idea...";

pub const HELP: &str = "\
Comandos:
  <texto>            mejora la idea escrita (igual que /improve <texto>)
  /improve <texto>   genera la respuesta (prompt mejorado)
  /image             genera la imagen a partir del prompt mejorado
  /prompt            muestra el prompt mejorado actual
  /help              muestra esta ayuda
  /quit              sale";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Improve(String),
    GenerateImage,
    ShowPrompt,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

impl Command {
    /// Parse one line of user input.
    ///
    /// The idea text of an improve command is kept as typed apart from the
    /// command word and the line terminator.
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            return Command::Empty;
        }

        let trimmed = line.trim_start();
        if !trimmed.starts_with('/') {
            return Command::Improve(line.to_string());
        }

        let (word, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest),
            None => (trimmed, ""),
        };

        match word {
            "/improve" | "/mejorar" => Command::Improve(rest.trim_start().to_string()),
            "/image" | "/imagen" => Command::GenerateImage,
            "/prompt" => Command::ShowPrompt,
            "/help" | "/ayuda" => Command::Help,
            "/quit" | "/exit" | "/salir" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A single line of user-visible status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(BannerKind::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(BannerKind::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(BannerKind::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(BannerKind::Error, message)
    }

    fn new(kind: BannerKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn text_error(err: &crate::Error) -> Self {
        Self::error(format!("Error al generar la respuesta: {}", err))
    }

    pub fn image_error(err: &crate::Error) -> Self {
        Self::error(format!("Error al generar la imagen: {}", err))
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            BannerKind::Info => "[i]",
            BannerKind::Success => "[ok]",
            BannerKind::Warning => "[!]",
            BannerKind::Error => "[error]",
        };
        write!(f, "{} {}", prefix, self.message)
    }
}

pub fn improved_prompt_line(prompt: &str) -> String {
    format!("Prompt mejorado: '{}'", prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_improve() {
        assert_eq!(
            Command::parse("un dragón de cristal\n"),
            Command::Improve("un dragón de cristal".to_string())
        );
    }

    #[test]
    fn test_improve_command_keeps_idea() {
        assert_eq!(
            Command::parse("/improve   un bosque  "),
            Command::Improve("un bosque  ".to_string())
        );
        assert_eq!(Command::parse("/improve"), Command::Improve(String::new()));
    }

    #[test]
    fn test_slash_commands() {
        assert_eq!(Command::parse("/image"), Command::GenerateImage);
        assert_eq!(Command::parse("/imagen\r\n"), Command::GenerateImage);
        assert_eq!(Command::parse("/prompt"), Command::ShowPrompt);
        assert_eq!(Command::parse("/help"), Command::Help);
        assert_eq!(Command::parse("/exit"), Command::Quit);
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(
            Command::parse("/draw now"),
            Command::Unknown("/draw".to_string())
        );
        assert_eq!(Command::parse("   \n"), Command::Empty);
    }

    #[test]
    fn test_banner_rendering() {
        assert_eq!(Banner::warning("cuidado").to_string(), "[!] cuidado");
        let err = crate::Error::AiProvider("quota".to_string());
        assert_eq!(
            Banner::image_error(&err).to_string(),
            "[error] Error al generar la imagen: AI provider error: quota"
        );
    }
}
