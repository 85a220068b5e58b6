//! Handwriting Canvas - command line front end
//!
//! Replays recorded gesture scripts against the canvas and prints the
//! resulting strokes, selection and recognized text as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use handwriting_canvas::canvas::Canvas;
use handwriting_canvas::config::{self, AppConfig};
use handwriting_canvas::recognition::{CommandRecognizer, RecognitionWorker, UnavailableRecognizer};
use handwriting_canvas::script;
use handwriting_canvas::session::DrawingSession;

/// Handwriting Canvas - freehand drawing with lasso text selection
#[derive(Parser, Debug)]
#[command(name = "handwriting-canvas")]
#[command(about = "Replay drawing gestures and recognize text in lasso selections")]
struct Args {
    /// Gesture script to replay (JSON array of actions)
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", toml::to_string_pretty(&AppConfig::default())?);
        return Ok(());
    }

    let config = load_or_create_config(args.config.as_deref())?;

    // Initialize logging; RUST_LOG takes precedence over the config file
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Handwriting Canvas starting...");

    let Some(script_path) = args.script else {
        info!("No script given, nothing to replay");
        return Ok(());
    };

    let actions = script::load_script(&script_path)?;
    info!("Loaded {} script step(s) from {:?}", actions.len(), script_path);

    let mut session = build_session(&config)?;
    let timeout = Duration::from_millis(config.recognizer.response_timeout_ms);
    let report = script::run_script(&mut session, &actions, timeout);

    println!("{}", serde_json::to_string_pretty(&report)?);

    info!("Handwriting Canvas shutdown complete");

    Ok(())
}

/// Load configuration from an explicit path, the user config file, or defaults
fn load_or_create_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    if let Some(path) = path {
        return config::load_config(path);
    }

    if let Ok(config_path) = config::default_config_path() {
        if config_path.exists() {
            return config::load_config(&config_path);
        }
    }

    Ok(AppConfig::default())
}

/// Create the canvas and the recognition worker described by the config
fn build_session(config: &AppConfig) -> Result<DrawingSession> {
    let canvas = Canvas::new(config.canvas_settings());

    let worker = match &config.recognizer.command {
        Some(program) => {
            info!("Using external recognizer '{}'", program);
            RecognitionWorker::spawn(CommandRecognizer::new(
                program.clone(),
                config.recognizer.args.clone(),
            ))
        }
        None => {
            info!("No recognizer configured, recognition is unavailable");
            RecognitionWorker::spawn(UnavailableRecognizer)
        }
    }
    .context("Failed to start text recognition")?;

    Ok(DrawingSession::new(canvas, worker, config.recognition.clone())
        .with_canvas_size(config.canvas.width, config.canvas.height))
}
