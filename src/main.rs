//! Quill Runtime
//!
//! Entry point: CLI args, startup preconditions (server reachable, model
//! installed), and the interactive chat loop.

use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use dialoguer::Input;
use tracing_subscriber::EnvFilter;

use quill::agent::Session;
use quill::config::load_config;
use quill::ollama::{ChatTransport, OllamaClient};
use quill::output::ConsoleSink;
use quill::types::{default_config, LogLevel, QuillConfig};

/// Quill -- Interactive Coding Assistant for Ollama
#[derive(Parser, Debug)]
#[command(
    name = "quill",
    version,
    about = "Interactive coding assistant for local Ollama models",
    long_about = "Chat with a local Ollama model that can read and write files on your behalf."
)]
struct Cli {
    /// Model identifier (overrides the config file)
    #[arg(long)]
    model: Option<String>,

    /// Base URL of the Ollama server (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,
}

/// Map the configured log level to a default tracing filter; `RUST_LOG`
/// still takes precedence.
fn init_tracing(level: LogLevel) {
    let default = match level {
        LogLevel::Debug => "quill=debug",
        LogLevel::Info => "quill=info",
        LogLevel::Warn => "quill=warn",
        LogLevel::Error => "quill=error",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .init();
}

fn show_banner(config: &QuillConfig) {
    println!();
    println!("{}", "  🤖 Quill -- Ollama Coding Assistant".blue().bold());
    println!("{}", format!("  Model: {}", config.model).white());
    println!("{}", format!("  Server: {}", config.base_url).white());
    println!("{}", "  Type 'exit', 'quit', or 'bye' to end the session.".dimmed());
    println!("{}", "  Type '/clear' to clear conversation history.".dimmed());
    println!("{}", "  Type '/help' for available commands.".dimmed());
    println!();
}

fn show_help() {
    println!();
    println!("{}", "  Available commands:".cyan().bold());
    println!("    /clear              Clear conversation history");
    println!("    /help               Show this help message");
    println!("    exit, quit, bye     End the session");
    println!();
    println!("{}", "  Available tools (used automatically by the AI):".cyan().bold());
    println!("    Read files          The AI can read file contents");
    println!("    Write files         The AI can create or modify files");
    println!();
}

/// Startup preconditions: the server must answer the model listing, and the
/// configured model must be installed. Either failure is fatal before any
/// turn is processed.
async fn check_preconditions(client: &OllamaClient, config: &QuillConfig) -> bool {
    let models = match client.list_models().await {
        Ok(models) => models,
        Err(err) => {
            eprintln!(
                "{}",
                format!("❌ Cannot connect to Ollama at {}", config.base_url).red()
            );
            eprintln!("Make sure Ollama is running with: {}", "ollama serve".cyan());
            tracing::debug!("precondition failure: {:#}", err);
            return false;
        }
    };

    if !models.iter().any(|m| m == &config.model) {
        eprintln!(
            "{}",
            format!("⚠️  Model '{}' not found.", config.model).yellow()
        );
        eprintln!(
            "Please install it with: {}",
            format!("ollama pull {}", config.model).cyan()
        );
        return false;
    }

    true
}

/// The interactive session loop. Returns on an exit command or when the
/// prompt is interrupted (Ctrl-C / EOF).
async fn run_session(mut session: Session) {
    loop {
        println!();
        let line: String = match Input::new()
            .with_prompt("You".green().bold().to_string())
            .allow_empty(true)
            .interact_text()
        {
            Ok(line) => line,
            Err(_) => {
                println!("{}", "👋 Goodbye!".yellow());
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "exit" | "quit" | "bye" => {
                println!("{}", "👋 Goodbye!".yellow());
                break;
            }
            "/clear" => {
                session.clear();
                println!("{}", "🧹 Conversation history cleared.".yellow());
                continue;
            }
            "/help" => {
                show_help();
                continue;
            }
            _ => {}
        }

        println!();
        println!("{}", "🤖 Assistant".cyan().bold());
        println!("{}", "Thinking...".dimmed());

        let response = session.chat(input).await;
        if !response.is_empty() {
            println!("{}", response);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = load_config().unwrap_or_else(default_config);
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }

    init_tracing(config.log_level);

    let client = OllamaClient::new(
        config.base_url.clone(),
        config.model.clone(),
        config.timeout_secs,
    );

    if !check_preconditions(&client, &config).await {
        std::process::exit(1);
    }

    show_banner(&config);

    let session = Session::new(Box::new(client), Arc::new(ConsoleSink));
    run_session(session).await;
}
