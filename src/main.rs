//! Menneskesyn CLI
//!
//! Terminal front end for the reflection quiz. Reads one command per line
//! from stdin and renders every state change as plain text.
//!
//! The credential comes from `--key`, the `key`/`apiKey` parameter of
//! `--launch-url`, or `MENNESKESYN__AI__API_KEY`, in that order. Without one
//! the quiz asks for it.

use std::sync::Arc;

use clap::Parser;
use secrecy::SecretString;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, EnvFilter};

use menneskesyn::adapters::ai::{GeminiConnector, MockAIProvider, MockConnector};
use menneskesyn::application::{
    credential_from_launch_url, first_credential, GenerationSettings, QuizController,
};
use menneskesyn::config::{AppConfig, ConfigError, LoggingConfig};
use menneskesyn::domain::catalog::CatalogError;
use menneskesyn::domain::foundation::ValidationError;
use menneskesyn::domain::quiz::{QuizError, QuizPhase};
use menneskesyn::ports::ProviderConnector;

mod render;

/// Menneskesyn - reflection quiz on view of human nature and self-leadership
#[derive(Parser)]
#[command(name = "menneskesyn")]
#[command(version)]
#[command(about = "Refleksjonsspill om menneskesyn og selvledelse")]
struct Cli {
    /// API key for the generation service
    #[arg(long)]
    key: Option<String>,

    /// Launch URL carrying the key as `key` or `apiKey` query parameter
    #[arg(long)]
    launch_url: Option<String>,

    /// Use canned responses instead of the generation service
    #[arg(long)]
    mock: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("launch url: {0}")]
    LaunchUrl(#[from] ValidationError),

    #[error("stdin: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    config.validate().map_err(ConfigError::from)?;

    init_tracing(cli.verbose, &config.logging);

    let catalog = config.quiz.catalog()?;
    tracing::info!(dimensions = catalog.len(), mock = cli.mock, "Starting quiz");

    let connector: Arc<dyn ProviderConnector> = if cli.mock {
        Arc::new(MockConnector::new(MockAIProvider::new()))
    } else {
        Arc::new(
            GeminiConnector::new(&config.ai.model)
                .with_base_url(&config.ai.base_url)
                .with_timeout(config.ai.timeout())
                .with_max_retries(config.ai.max_retries),
        )
    };

    let settings = GenerationSettings {
        // The provider timeout is per attempt; the client bounds the whole call.
        timeout: config.ai.timeout() * (config.ai.max_retries + 1),
        max_tokens: config.ai.max_tokens,
        temperature: config.ai.temperature,
    };

    let from_url = match &cli.launch_url {
        Some(url) => credential_from_launch_url(url)?,
        None => None,
    };
    let mut external = first_credential([
        cli.key.clone().map(SecretString::new),
        from_url,
        config.ai.api_key.clone(),
    ]);
    if external.is_none() && cli.mock {
        external = Some(SecretString::new("mock".to_string()));
    }

    let mut controller = QuizController::new(catalog, connector, settings);
    controller.bootstrap(external);

    spawn_loading_indicator(&controller);
    spawn_interrupt_handler(&controller);

    println!("{}", render::screen(&controller.snapshot()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(input) = lines.next_line().await? {
        let input = input.trim();
        if matches!(input, "q" | "quit" | "avslutt") {
            break;
        }

        if let Err(err) = dispatch(&mut controller, input).await {
            tracing::debug!(code = %err.code(), error = %err, "Command not valid here");
            println!("(Ikke mulig her: {})", err);
        }

        println!("{}", render::screen(&controller.snapshot()));
    }

    tracing::info!("Quiz ended");
    Ok(())
}

/// Maps one input line to a controller action for the current phase.
async fn dispatch(controller: &mut QuizController, input: &str) -> Result<(), QuizError> {
    match input {
        "restart" | "start på nytt" => {
            controller.restart();
            return Ok(());
        }
        "lukk" => {
            controller.dismiss_error();
            return Ok(());
        }
        _ => {}
    }

    match controller.session().phase() {
        QuizPhase::KeyEntry if input.is_empty() => Ok(()),
        QuizPhase::KeyEntry => controller.submit_key(SecretString::new(input.to_string())),
        QuizPhase::Intro => controller.start(),
        QuizPhase::DimensionInput => match input.parse::<u8>() {
            Ok(value) => controller.select_value(value).await,
            Err(_) => {
                println!("Skriv et tall fra 1 til 5.");
                Ok(())
            }
        },
        QuizPhase::FeedbackDisplay => controller.next().await,
        QuizPhase::SummaryError => controller.retry_summary().await,
        QuizPhase::SummaryDisplay | QuizPhase::FeedbackLoading | QuizPhase::SummaryLoading => {
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8, logging: &LoggingConfig) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level)),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    if logging.is_json() {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Prints the loading text as soon as a generation call starts.
fn spawn_loading_indicator(controller: &QuizController) {
    let mut rx = controller.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let phase = rx.borrow_and_update().phase;
            if let Some(message) = phase.loading_message() {
                println!("{}", message);
            }
        }
    });
}

/// Ctrl-C cancels a pending call; when nothing is pending it exits.
fn spawn_interrupt_handler(controller: &QuizController) {
    let handle = controller.cancel_handle();
    let rx = controller.subscribe();
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if rx.borrow().phase.is_loading() {
                tracing::info!("Cancelling pending generation call");
                handle.cancel();
            } else {
                std::process::exit(130);
            }
        }
    });
}
