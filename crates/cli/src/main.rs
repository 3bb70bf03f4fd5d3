//! Reverie CLI: the main entry point.
//!
//! Commands:
//! - `chat`    Talk with your journal (interactive or single message)
//! - `search`  Show which entries a query retrieves
//! - `config`  Print the effective or default configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "reverie",
    about = "Reverie: chat with your journal",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant about your journal
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Search the journal and print ranked entries
    Search {
        /// Query text
        query: String,

        /// Maximum number of hits to print
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Print the configuration
    Config {
        /// Print a starter config file instead of the effective configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Chat { message } => commands::chat::run(message).await?,
        Commands::Search { query, limit } => commands::search::run(&query, limit).await?,
        Commands::Config { default } => commands::config_cmd::run(default)?,
    }

    Ok(())
}
