//! Ragdesk CLI
//!
//! Terminal client for a retrieval-augmented-generation backend: chat with
//! it, upload source documents, and browse the stored chunks.

mod commands;


use clap::{Parser, Subcommand};
use commands::{AskCommand, ChatCommand, ChunksCommand, DocsCommand, StatusCommand, UploadCommand};
use ragdesk_client::create_backend;
use ragdesk_core::{config::AppConfig, logging, AppResult};
use ragdesk_session::BusyPolicy;
use std::path::PathBuf;

/// Ragdesk - chat with a RAG backend and browse its knowledge base
#[derive(Parser, Debug)]
#[command(name = "ragdesk")]
#[command(about = "Chat with a RAG backend and browse its knowledge base", long_about = None)]
#[command(version)]
struct Cli {
    /// Backend base URL (default: http://127.0.0.1:8000)
    #[arg(short, long, global = true, env = "RAGDESK_BASE_URL")]
    base_url: Option<String>,

    /// Path to config file (default: ./ragdesk.yaml if present)
    #[arg(short, long, global = true, env = "RAGDESK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Ignore new questions and uploads while either is in flight
    #[arg(long, global = true)]
    single_flight: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive chat session (default)
    Chat(ChatCommand),

    /// Ask a single question
    Ask(AskCommand),

    /// Upload documents into the knowledge base
    Upload(UploadCommand),

    /// List ingested documents
    Docs(DocsCommand),

    /// Show the stored chunks of one document
    Chunks(ChunksCommand),

    /// Check whether the backend is reachable
    Status(StatusCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_with(cli.config.clone())?.with_overrides(
        cli.base_url,
        cli.log_level,
        cli.verbose,
        cli.no_color,
        cli.single_flight,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;
    config.validate()?;

    tracing::info!("Ragdesk starting");
    tracing::debug!("Backend: {}", config.base_url);
    tracing::debug!("Single flight: {}", config.single_flight);

    let backend = create_backend(&config.normalized_base_url())?;
    let policy = BusyPolicy::from_single_flight(config.single_flight);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Chat(ChatCommand::default()));

    let command_name = match &command {
        Commands::Chat(_) => "chat",
        Commands::Ask(_) => "ask",
        Commands::Upload(_) => "upload",
        Commands::Docs(_) => "docs",
        Commands::Chunks(_) => "chunks",
        Commands::Status(_) => "status",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match command {
        Commands::Chat(cmd) => cmd.execute(backend, policy).await,
        Commands::Ask(cmd) => cmd.execute(backend, policy).await,
        Commands::Upload(cmd) => cmd.execute(backend, policy).await,
        Commands::Docs(cmd) => cmd.execute(backend, policy).await,
        Commands::Chunks(cmd) => cmd.execute(backend, policy).await,
        Commands::Status(cmd) => cmd.execute(backend).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
