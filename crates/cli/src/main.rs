//! chatroute CLI: the main entry point.
//!
//! Commands:
//! - `chat`: Interactive chat session
//! - `ask`: Send a single message and print the reply
//! - `classify`: Show how a message would be routed
//! - `doctor`: Diagnose configuration and credentials
//! - `onboard`: Write a starter config file

use std::path::PathBuf;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "chatroute",
    about = "chatroute — a chatbot that routes weather and search questions to live data",
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
    /// Start an interactive chat session
    Chat {
        /// Load history from this file and save it after every turn
        #[arg(long, env = "CHATROUTE_HISTORY_FILE")]
        history_file: Option<PathBuf>,
    },

    /// Send a single message and print the reply
    Ask {
        /// The message to send
        message: String,
    },

    /// Classify a message without calling any provider
    Classify {
        /// The text to classify
        text: String,
    },

    /// Diagnose configuration and credentials
    Doctor,

    /// Write the default configuration file
    Onboard,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the conversation.
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
        Commands::Chat { history_file } => commands::chat::run(history_file).await?,
        Commands::Ask { message } => commands::ask::run(message).await?,
        Commands::Classify { text } => commands::classify::run(text).await?,
        Commands::Doctor => commands::doctor::run().await?,
        Commands::Onboard => commands::onboard::run().await?,
    }

    Ok(())
}
