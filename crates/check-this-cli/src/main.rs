//! check-this CLI tool.
//!
//! Usage:
//! ```bash
//! check-this analyze --path svc/client.py < svc/client.py
//! check-this analyze --lang typescript --format text < app.ts
//! check-this list-rules
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;
mod exit_codes;

use commands::analyze::AnalyzeArgs;
use exit_codes::{EXIT_INTERNAL_ERROR, EXIT_SUCCESS};

/// Reliability linter for Python, JavaScript and TypeScript sources
#[derive(Parser)]
#[command(name = "check-this")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze source read from stdin
    Analyze {
        /// Path of the file being analyzed; used for language detection,
        /// config lookup and reporting
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Language of the source (python, javascript, typescript)
        #[arg(short, long)]
        lang: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List available rules
    ListRules,
}

/// Output format for analysis results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// The JSON envelope.
    #[default]
    Json,
    /// Human-readable report with source snippets.
    Text,
    /// One-line-per-diagnostic compact format.
    Compact,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let code = match cli.command {
        Commands::Analyze {
            path,
            lang,
            format,
            config,
        } => {
            let args = AnalyzeArgs {
                path,
                lang,
                format,
                config,
            };
            match commands::analyze::run(&args) {
                Ok(()) => EXIT_SUCCESS,
                Err(err) => {
                    eprintln!("error: {err}");
                    err.exit_code()
                }
            }
        }
        Commands::ListRules => match commands::list_rules::run() {
            Ok(()) => EXIT_SUCCESS,
            Err(err) => {
                eprintln!("error: {err}");
                EXIT_INTERNAL_ERROR
            }
        },
    };

    std::process::exit(code);
}
