//! One module per subcommand.

use super::*;

pub mod authors;
pub mod cited_by;
pub mod harvest;
pub mod init;
pub mod list;
pub mod remove;
pub mod search;
pub mod stats;

pub use self::{
  authors::{authors, AuthorsArgs},
  cited_by::{cited_by, CitedByArgs},
  harvest::{harvest, HarvestArgs},
  init::{init, InitArgs},
  list::{list, ListArgs},
  remove::{remove, RemoveArgs},
  search::{search, SearchArgs},
  stats::stats,
};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Write a configuration file and create the article store
  Init(InitArgs),

  /// Search the scholarly service and store the results
  Search(SearchArgs),

  /// Store the works of one or more researchers
  Harvest(HarvestArgs),

  /// Store the works citing a stored article
  CitedBy(CitedByArgs),

  /// List stored articles
  List(ListArgs),

  /// List stored authors and their statistics
  Authors(AuthorsArgs),

  /// Remove a stored article or author
  Remove(RemoveArgs),

  /// Show storage statistics
  Stats,
}

/// Admission policy choices on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolicyArg {
  /// A bounded pool of reusable connections
  Pooled,
  /// One operation at a time
  Serialized,
}

impl From<PolicyArg> for AdmissionPolicy {
  fn from(value: PolicyArg) -> Self {
    match value {
      PolicyArg::Pooled => AdmissionPolicy::Pooled,
      PolicyArg::Serialized => AdmissionPolicy::Serialized,
    }
  }
}

/// Picks the explicit cap or falls back to the configured one.
fn cap_or_default(cap: Option<usize>, config: &Config) -> Result<usize> {
  let cap = cap.unwrap_or(config.ingest.per_query_cap);
  if cap == 0 {
    return Err(ScholardError::Usage("--cap must be at least 1".to_string()));
  }
  Ok(cap)
}
