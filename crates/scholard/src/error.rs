//! Errors surfaced by the command line front end.

use thiserror::Error;

use super::*;

/// Everything a command can fail with.
#[derive(Error, Debug)]
pub enum ScholardError {
  /// Failure inside the library
  #[error(transparent)]
  Scholar(#[from] ScholarError),

  /// Failure while prompting the user
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// Failure while reading input files
  #[error(transparent)]
  IO(#[from] std::io::Error),

  /// The command line was well formed but unusable
  #[error("{0}")]
  Usage(String),
}

/// Result alias for CLI commands.
pub type Result<T> = core::result::Result<T, ScholardError>;
