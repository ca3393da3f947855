use anyhow::Result;
use clap::{Parser, Subcommand};
use jdm_design::app::App;
use jdm_design::models::Config;
use jdm_design::ui::{self, Banner};
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "jdm-design")]
#[command(about = "Turn a rough idea into an improved prompt and an AI-generated image")]
#[command(version)]
struct CliArgs {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Read secrets and settings from this file instead of `.env`.
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Directory that receives one sub-directory of images per session.
    #[arg(long, global = true, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Use built-in mock providers instead of the hosted models.
    #[arg(long, global = true)]
    mock: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start an interactive session (default)
    Interactive,

    /// Improve an idea and print the resulting prompt
    Improve {
        /// The idea to improve
        idea: String,
    },

    /// Improve an idea, then generate and save an image for it
    Generate {
        /// The idea to improve
        idea: String,
    },
}

fn load_config(args: &CliArgs) -> jdm_design::Result<Config> {
    let mut config = match &args.env_file {
        Some(path) => Config::from_env_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

fn build_app(args: &CliArgs) -> jdm_design::Result<App> {
    let config = load_config(args)?;
    if args.mock {
        Ok(App::offline(&config))
    } else {
        App::new(&config)
    }
}

async fn run(mut app: App, command: Commands) -> jdm_design::Result<bool> {
    let mut stdout = std::io::stdout();

    match command {
        Commands::Interactive => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            app.run_interactive(stdin, &mut stdout).await?;
            Ok(true)
        }
        Commands::Improve { idea } => match app.improve_idea(&idea).await {
            Ok(prompt) => {
                writeln!(stdout, "{}", ui::improved_prompt_line(&prompt))?;
                Ok(true)
            }
            Err(e) => {
                writeln!(stdout, "{}", Banner::text_error(&e))?;
                Ok(false)
            }
        },
        Commands::Generate { idea } => {
            let prompt = match app.improve_idea(&idea).await {
                Ok(prompt) => prompt,
                Err(e) => {
                    writeln!(stdout, "{}", Banner::text_error(&e))?;
                    return Ok(false);
                }
            };
            writeln!(stdout, "{}", ui::improved_prompt_line(&prompt))?;
            writeln!(stdout, "{}", Banner::info(ui::IMAGE_PROGRESS))?;

            match app.generate_image().await {
                Ok(image) => {
                    writeln!(stdout, "{}", Banner::success(image.caption()))?;
                    writeln!(stdout, "{}", image.path.display())?;
                    Ok(true)
                }
                Err(e) => {
                    writeln!(stdout, "{}", Banner::image_error(&e))?;
                    Ok(false)
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jdm_design=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = CliArgs::parse();
    let command = args.command.take().unwrap_or(Commands::Interactive);

    info!("Starting jdm-design");

    let app = match build_app(&args) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    match run(app, command).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("Session failed: {}", e);
            std::process::exit(1);
        }
    }
}
