//! Command line front end for the `scholar` ingestion library.
//!
//! This crate provides the `scholar` binary. It supports:
//! - Writing a configuration file and creating the article store
//! - Free-text searches whose results are ingested
//! - Batch harvesting of the works of many researchers
//! - Following the citing works of a stored article
//! - Listing stored articles and authors, with filters
//! - Soft removal of articles and authors
//! - Storage statistics
//!
//! # Usage
//!
//! ```bash
//! # Write a configuration and create the store
//! scholar init --api-key "$SERP_API_KEY"
//!
//! # Harvest two researchers, 10 works each
//! scholar harvest "JL Harper" "M. Curie" --cap 10
//!
//! # Look at what is stored
//! scholar list --author "JL Harper" --order citations --desc
//! scholar authors --top 5
//! scholar stats
//! ```
//!
//! Destructive operations ask for confirmation. Logging verbosity grows with each `-v`.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use clap::{builder::ArgAction, Args, Parser, Subcommand, ValueEnum};
use console::style;
use scholar::{
  article::{Article, Author},
  config::{AdmissionPolicy, Config},
  database::{
    AuthorQuery, Database, OrderField, Query, QueryCriteria, Remove, Stats, StorageStats,
  },
  error::ScholarError,
  prelude::*,
  Scholar,
};
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Harvest scholarly search results into a local store")]
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

  /// Path to the configuration file. If not specified, uses the default platform-specific
  /// configuration directory.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

impl Cli {
  /// The configuration file in use.
  fn config_path(&self) -> PathBuf { self.config.clone().unwrap_or_else(Config::default_path) }
}

/// Configures the logging system based on the verbosity level
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
///
/// `RUST_LOG` takes precedence when set.
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
    .with_thread_ids(true)
    .with_target(true)
    .init();
}

/// Entry point for the `scholar` CLI application
///
/// Commands that talk to the search service need a complete configuration including an API key.
/// Commands that only read or maintain the store need just the database path.
#[tokio::main]
async fn main() {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  if let Err(error) = run(&cli).await {
    let _ = cli.reply(ResponseContent::Error(error));
    std::process::exit(1);
  }
}

/// Dispatches the parsed command.
async fn run(cli: &Cli) -> Result<()> {
  if let Commands::Init(args) = &cli.command {
    return init(cli, cli.config_path(), args.clone()).await;
  }

  let config_path = cli.config_path();
  trace!(path = %config_path.display(), "Using configuration");
  let config = match Config::load(&config_path) {
    Ok(config) => config,
    Err(ScholarError::Path(error)) if error.kind() == std::io::ErrorKind::NotFound => {
      debug!(%error, "Configuration file is missing");
      return Err(ScholardError::Usage(format!(
        "no configuration at {}, run `scholar init` first",
        config_path.display()
      )));
    },
    Err(error) =>
      return Err(ScholardError::Usage(format!(
        "invalid configuration at {}: {error}",
        config_path.display()
      ))),
  };

  match &cli.command {
    Commands::Init(_) => Ok(()),
    Commands::Search(args) => search(cli, Scholar::from_config(config).await?, args.clone()).await,
    Commands::Harvest(args) =>
      harvest(cli, Scholar::from_config(config).await?, args.clone()).await,
    Commands::CitedBy(args) =>
      cited_by(cli, Scholar::from_config(config).await?, args.clone()).await,
    Commands::List(args) => list(cli, &Database::from_config(&config).await?, args.clone()).await,
    Commands::Authors(args) =>
      authors(cli, &Database::from_config(&config).await?, args.clone()).await,
    Commands::Remove(args) =>
      remove(cli, &Database::from_config(&config).await?, args.clone()).await,
    Commands::Stats => stats(cli, &Database::from_config(&config).await?).await,
  }
}
