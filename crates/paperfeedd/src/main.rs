//! Command line runner for the paperfeed pipeline.
//!
//! This crate provides the `paperfeed` binary on top of the `paperfeed` library. It supports:
//! - Writing a default configuration file
//! - Running one fetch, summarize, merge and save cycle
//! - Browsing the stored collection by text, tag and date
//!
//! # Usage
//!
//! ```bash
//! # Write ~/.config/paperfeed/config.toml
//! paperfeed init
//!
//! # Fetch the last three days of papers into the store
//! GEMINI_API_KEY=... paperfeed run --lookback-days 3
//!
//! # Show stored papers about fuzzing
//! paperfeed list --search fuzzing --tag cs.CR
//! ```
//!
//! A `.env` file in the working directory is read before arguments are parsed, so
//! `GEMINI_API_KEY` can live there. Logging goes to stderr and is controlled with `-v` (repeat for
//! more detail) or `RUST_LOG`.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{builder::ArgAction, Args, Parser, Subcommand};
use console::style;
use paperfeed::{
  enrich::SummaryEnricher,
  merge::MergeMode,
  paper::Paper,
  pipeline::{Pipeline, RunReport},
  prelude::*,
  query::{all_tags, Query},
  retriever::Arxiv,
  store::Store,
  Config,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Fetch recent arXiv papers and store them with generated summaries")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the configuration file. If not specified, uses the default platform-specific config
  /// directory.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,
}

impl Cli {
  /// The configuration file this invocation refers to.
  fn config_path(&self) -> PathBuf { self.config.clone().unwrap_or_else(Config::default_path) }
}

/// Configures the logging system based on the verbosity level
///
/// # Arguments
///
/// * `verbosity` - Number of times the verbose flag was used (0-4)
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .init();
}

/// Entry point for the paperfeed CLI application
///
/// Loads `.env`, parses arguments, sets up logging and executes the requested command.
///
/// Exits with status 1 after printing the error when:
/// - The configuration file cannot be read or is invalid
/// - The arXiv request fails
/// - The store cannot be written
#[tokio::main]
async fn main() {
  let dotenv = dotenvy::dotenv();
  let cli = Cli::parse();
  setup_logging(cli.verbose);
  if let Ok(path) = dotenv {
    debug!("Loaded environment from {}", path.display());
  }

  let outcome = match cli.command.clone() {
    Commands::Init(args) => init(&cli, args).await,
    Commands::Run(args) => run(&cli, args).await,
    Commands::List(args) => list(&cli, args).await,
    Commands::Tags(args) => tags(&cli, args).await,
  };

  if let Err(e) = outcome {
    reply(ResponseContent::Error(&e));
    std::process::exit(1);
  }
}
