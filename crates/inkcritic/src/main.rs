//! inkcritic CLI - calligraphy comments from a multimodal LLM.
//!
//! # Usage
//!
//! ```bash
//! # Comment on a local photo of a work
//! inkcritic comment ./work.jpg --student 小明 --style warm
//!
//! # Machine-readable outcome
//! inkcritic comment https://cdn.example.com/work.jpg --json
//!
//! # View configuration
//! inkcritic config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// inkcritic - Calligraphy comments from a multimodal LLM.
#[derive(Parser, Debug)]
#[command(name = "inkcritic")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "INKCRITIC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a comment for one calligraphy image
    Comment(cli::comment::CommentArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match cli::load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `inkcritic config path`."
            );
            inkcritic_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("inkcritic v{}", inkcritic_core::VERSION);

    match cli.command {
        Commands::Comment(args) => cli::comment::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, cli.config.as_deref()).await,
    }
}
