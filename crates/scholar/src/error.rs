//! Error types for the scholar library.
//!
//! Failures fall into a handful of families, and callers usually care about which family
//! an error belongs to rather than the exact variant:
//! - Transport: the external search service could not be reached or answered badly
//! - Validation: a candidate article is not fit for storage
//! - Storage: a SQLite statement or connection failed
//! - Configuration and input problems
//!
//! Inside the ingestion pipeline, transport and storage errors are recovered at per-query
//! and per-record granularity. They only surface to callers of the single-record APIs.
//!
//! # Examples
//!
//! ```
//! use scholar::error::{ScholarError, ValidationError};
//!
//! let err = ScholarError::from(ValidationError::MissingAuthors);
//! assert!(!err.is_storage());
//! assert!(!err.is_transport());
//! ```

use thiserror::Error;

/// Error type alias used for the [`scholar`](crate) crate.
pub type Result<T> = core::result::Result<T, ScholarError>;

/// Errors that can occur when searching, normalizing, or storing scholarly records.
#[derive(Error, Debug)]
pub enum ScholarError {
  /// A network request to the search service failed.
  ///
  /// This covers DNS failures, refused connections, TLS errors and timeouts
  /// raised by the HTTP client.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The search service answered with a non-success status code.
  ///
  /// The body is kept (truncated) to make the upstream complaint visible in logs.
  #[error("search service returned HTTP {status}: {body}")]
  Transport {
    /// HTTP status code returned by the service
    status: u16,
    /// Leading part of the response body
    body:   String,
  },

  /// A response body could not be decoded.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// A candidate article failed validation.
  #[error(transparent)]
  Validation(#[from] ValidationError),

  /// A SQLite operation failed.
  ///
  /// This wraps errors from the `rusqlite` crate, covering:
  /// - SQL syntax errors
  /// - Constraint violations
  /// - Type conversion errors
  #[error(transparent)]
  Sqlite(#[from] rusqlite::Error),

  /// An async SQLite operation failed.
  ///
  /// This wraps errors from the `tokio-rusqlite` crate, including a closed
  /// background connection.
  #[error(transparent)]
  AsyncSqlite(#[from] tokio_rusqlite::Error),

  /// A storage row that the operation depends on does not exist (or is soft-deleted).
  #[error("{entity} with id {id} not found")]
  NotFound {
    /// Kind of record that was looked up
    entity: &'static str,
    /// Identifier that was looked up
    id:     i64,
  },

  /// The storage admission policy no longer hands out connections.
  #[error("storage admission has been closed")]
  AdmissionClosed,

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// A caller-supplied argument violates an operation's precondition.
  #[error("invalid input: {0}")]
  InvalidInput(String),

  /// A configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// A configuration could not be serialized.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// The configuration is present but unusable.
  #[error("{0}")]
  Config(String),
}

/// Reasons a candidate article is rejected before it reaches storage.
///
/// These are not failures of the pipeline. A rejected candidate is skipped with a log line,
/// and only the single-record save path reports them as errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
  /// The title is empty or whitespace only.
  #[error("article has no title")]
  MissingTitle,

  /// The raw authors string is empty or whitespace only.
  #[error("article has no authors")]
  MissingAuthors,

  /// The publication year lies outside the accepted window.
  #[error("publication year {year} is outside {min}..={max}")]
  YearOutOfRange {
    /// Offending year
    year: i32,
    /// Lowest accepted year
    min:  i32,
    /// Highest accepted year
    max:  i32,
  },

  /// The citation counter is negative.
  #[error("citation count {0} is negative")]
  NegativeCitations(i64),

  /// The external id contains characters outside `[A-Za-z0-9_-]`.
  #[error("external id {0:?} is malformed")]
  MalformedExternalId(String),
}

impl ScholarError {
  /// Whether this error came from talking to the search service.
  pub fn is_transport(&self) -> bool {
    matches!(self, Self::Network(_) | Self::Transport { .. } | Self::Json(_))
  }

  /// Whether this error came from the storage layer.
  pub fn is_storage(&self) -> bool {
    matches!(
      self,
      Self::Sqlite(_) | Self::AsyncSqlite(_) | Self::NotFound { .. } | Self::AdmissionClosed
    )
  }
}
