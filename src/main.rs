// ABOUTME: Entry point for llama-chat — a terminal chatbot for hosted chat-completion APIs.
// ABOUTME: Parses CLI args, loads config and the API key, and launches the app.

use std::path::PathBuf;

use clap::Parser;
use tracing::error;

use llama_chat::app::App;
use llama_chat::config::{Config, Overrides};
use llama_chat::logging::init_logging;
use llama_chat::secret::ApiKey;

#[derive(Debug, Parser)]
#[command(name = "llama-chat", version, about = "Chat with a hosted LLaMA model in your terminal")]
struct Cli {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model id to request
    #[arg(long)]
    model: Option<String>,

    /// Session id whose history the conversation uses
    #[arg(long)]
    session: Option<String>,

    /// Write logs to this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load local .env if present.
    let _ = dotenvy::dotenv();

    let mut config = match cli.config {
        Some(ref path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply(Overrides {
        model: cli.model,
        session_id: cli.session,
        log_dir: cli.log_dir,
    })?;

    let log_guard = init_logging(&config.logging)?;

    let api_key = match ApiKey::from_env(&config.llm.api_key_env) {
        Ok(key) => key,
        Err(e) => {
            error!(error = %e, "startup halted");
            eprintln!("\u{274c} {}", e);
            drop(log_guard);
            std::process::exit(1);
        }
    };

    let result = App::new(config, api_key).run().await;
    drop(log_guard);
    result
}
