//! Read-side and maintenance operations on the [`Database`].
//!
//! Each instruction acquires one admitted handle for the duration of its execution, so
//! instructions obey the configured admission policy like the ingestion pipeline does.
//!
//! ```no_run
//! use scholar::{
//!   database::{AuthorQuery, Database, Query},
//!   prelude::*,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::open(Database::default_path()).await?;
//!
//! let cited = Query::cited_more_than(100).limit(10).execute(&db).await?;
//! let top = AuthorQuery::top_by_citations(5).execute(&db).await?;
//! # Ok(())
//! # }
//! ```

use rusqlite::{params, params_from_iter, types::Value, OptionalExtension, TransactionBehavior};

use super::*;

pub mod author_query;
pub mod query;
pub mod remove;
pub mod stats;

pub use self::{
  author_query::{AuthorCriteria, AuthorQuery},
  query::{OrderField, Query, QueryCriteria},
  remove::Remove,
  stats::{Stats, StorageStats},
};

/// An operation that can be executed against a [`Database`].
#[async_trait]
pub trait DatabaseInstruction {
  /// What the operation produces.
  type Output;

  /// Runs the operation on one admitted connection.
  async fn execute(&self, db: &Database) -> Result<Self::Output>;
}
