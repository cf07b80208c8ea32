//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod config_cmd;
mod interactive;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use disclosure_check::Config;

#[derive(Parser)]
#[command(name = "dcheck")]
#[command(about = "Check text for an explicit AI-generation or deepfake disclosure")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true, env = "DCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one piece of text
    Check {
        /// Text to analyze (reads --file or stdin when omitted)
        text: Option<String>,
        /// Read text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,
        /// Exit with status 2 when the text is not compliant
        #[arg(long)]
        strict: bool,
        /// Print the request body instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Start an interactive session (empty line analyzes, :q quits)
    Interactive,

    /// Show the effective configuration
    Config,

    /// Print the response schema declared to the provider
    Schema,
}

/// Parse arguments and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            text,
            file,
            json,
            strict,
            dry_run,
        } => {
            let options = check::CheckOptions {
                json,
                strict,
                dry_run,
            };
            check::cmd_check(&config, text, file, options).await
        }
        Commands::Interactive => interactive::cmd_interactive(&config).await,
        Commands::Config => config_cmd::cmd_config_show(&config),
        Commands::Schema => config_cmd::cmd_schema(),
    }
}
