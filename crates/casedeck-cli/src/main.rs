use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod app;
mod commands;
mod output;

use app::App;
use commands::{
    ai_config::AiConfigAction, case::CaseAction, document::DocumentAction,
    export::ExportArgs, session::SessionAction,
};

#[derive(Parser)]
#[command(name = "casedeck")]
#[command(about = "casedeck - manage analysis sessions and generated test cases", long_about = None)]
struct Cli {
    /// Base URL of the casedeck server (overrides config and CASEDECK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Path to an alternative config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List, create, switch, rename and delete sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Manage the test cases of the active session
    Case {
        #[command(subcommand)]
        action: CaseAction,
    },
    /// Upload a requirements document and generate test cases from it
    Document {
        #[command(subcommand)]
        action: DocumentAction,
    },
    /// Manage AI provider configurations
    AiConfig {
        #[command(subcommand)]
        action: AiConfigAction,
    },
    /// Export the (filtered) test cases of the active session to XLSX
    Export(ExportArgs),
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("casedeck=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let mut app = App::bootstrap(cli.config.as_deref(), cli.api_url.as_deref()).await?;

    let result = match cli.command {
        Commands::Session { action } => commands::session::run(&mut app, action).await,
        Commands::Case { action } => commands::case::run(&mut app, action).await,
        Commands::Document { action } => commands::document::run(&mut app, action).await,
        Commands::AiConfig { action } => commands::ai_config::run(&mut app, action).await,
        Commands::Export(args) => commands::export::run(&mut app, args).await,
    };

    app.flush_notifications();
    result
}
