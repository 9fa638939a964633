//! Sahayak CLI: the main entry point.
//!
//! Commands:
//! - `chat`     Talk to the assistant in the terminal
//! - `schemes`  List the schemes in the catalog
//! - `config`   Show or initialise the configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "sahayak",
    about = "Sahayak: a welfare scheme assistant",
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
    /// Start an interactive session
    Chat {
        /// Reply language (`te` or `en`); overrides the config file
        #[arg(short, long)]
        language: Option<String>,

        /// Recognition confidence attached to each typed line
        #[arg(short, long, default_value_t = 1.0)]
        confidence: f32,
    },

    /// List catalog schemes, or show one in full
    Schemes {
        /// Show a single scheme by id
        #[arg(long)]
        id: Option<String>,
    },

    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,

        /// Print the config file path only
        #[arg(long)]
        path: bool,
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
        Commands::Chat {
            language,
            confidence,
        } => commands::chat::run(language, confidence).await?,
        Commands::Schemes { id } => commands::schemes::run(id).await?,
        Commands::Config { init, path } => {
            if path {
                commands::config_cmd::path().await?
            } else if init {
                commands::config_cmd::init().await?
            } else {
                commands::config_cmd::show().await?
            }
        }
    }

    Ok(())
}
