//! Scholarly search result ingestion and normalization.
//!
//! `scholar` takes the loosely structured results of a scholarly search service and turns them
//! into validated, deduplicated, relationally linked records:
//!
//! - Parsing of composite `"authors - venue, year - publisher"` summary lines
//! - Splitting of free-text author lists, with truncation detection
//! - Normalization of raw results into articles
//! - Deduplicated storage in SQLite, with per-author running statistics
//! - Batch harvesting of many researchers with per-query failure isolation
//! - Pooled or serialized admission of storage connections
//!
//! # Getting Started
//!
//! ```no_run
//! use scholar::{config::Config, database::Query, prelude::*, Scholar};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let scholar = Scholar::from_config(Config::default().with_api_key("my-serpapi-key")).await?;
//!
//!   // Harvest the works of two researchers, 10 each
//!   let queries = vec!["JL Harper".to_string(), "M. Curie".to_string()];
//!   let articles = scholar.run_batch(&queries, 10).await;
//!   println!("Stored {} articles", articles.len());
//!
//!   // Look at what is stored
//!   let cited = Query::cited_more_than(100).execute(scholar.database()).await?;
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`parse`]: summary line and author list parsers
//! - [`article`]: article and author records, normalization and validation
//! - [`search`]: the search collaborator and its SerpApi implementation
//! - [`database`]: storage, admission policies and read-side instructions
//! - [`ingest`]: the ingestion pipeline
//! - [`batch`]: multi-query orchestration
//! - [`config`]: TOML configuration
//! - [`prelude`]: Common traits and types for ergonomic imports

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::HashMap,
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod article;
pub mod batch;
pub mod config;
pub mod database;
pub mod error;
pub mod ingest;
pub mod parse;
pub mod search;

use crate::{
  article::*,
  batch::Batch,
  config::*,
  database::*,
  error::*,
  ingest::Pipeline,
  parse::{
    normalize_whitespace,
    summary::{UNKNOWN_AUTHOR, UNKNOWN_PUBLISHER, UNKNOWN_SOURCE},
    AuthorList, PublicationSummary,
  },
  search::*,
};

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use scholar::{
///   database::{Database, Stats},
///   prelude::*,
/// };
///
/// async fn example() -> Result<(), ScholarError> {
///   let db = Database::open(Database::default_path()).await?;
///   let stats = Stats.execute(&db).await?;
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    database::DatabaseInstruction, error::ScholarError, search::ScholarSearch, Ingestor,
  };
}

/// The capability every front end needs: ingest raw results, or harvest researchers.
#[async_trait]
pub trait Ingestor: Send + Sync {
  /// Ingests at most `cap` raw results. See [`Pipeline::ingest`].
  async fn ingest(&self, results: &[RawSearchResult], cap: usize) -> Result<Vec<Article>>;

  /// Harvests the works of each researcher query. See [`Batch::run`].
  async fn run_batch(&self, queries: &[String], per_query_cap: usize) -> Vec<Article>;
}

/// The assembled library: configuration, storage, search backend and pipeline.
#[derive(Debug, Clone)]
pub struct Scholar {
  /// Configuration the instance was built from
  config:   Config,
  /// The article store
  database: Database,
  /// Multi-query orchestration over the pipeline and search backend
  batch:    Batch,
}

impl Scholar {
  /// Loads the configuration file at `path` and builds an instance from it.
  pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    Self::from_config(Config::load(path)?).await
  }

  /// Builds an instance backed by the SerpApi client described in `config`.
  pub async fn from_config(config: Config) -> Result<Self> {
    config.validate()?;
    let search = SerpApiClient::from_config(&config.search)?;
    Self::with_search(config, Arc::new(search)).await
  }

  /// Builds an instance over any search backend.
  pub async fn with_search(config: Config, search: Arc<dyn ScholarSearch>) -> Result<Self> {
    config.validate()?;
    let database = Database::from_config(&config).await?;
    let batch = Batch::new(search, Pipeline::new(database.clone()));
    Ok(Self { config, database, batch })
  }

  /// The configuration in use.
  pub fn config(&self) -> &Config { &self.config }

  /// The article store.
  pub fn database(&self) -> &Database { &self.database }

  /// The ingestion pipeline.
  pub fn pipeline(&self) -> &Pipeline { self.batch.pipeline() }

  /// Stores one article, surfacing every failure. See [`Pipeline::save_article`].
  pub async fn save_article(&self, article: Article) -> Result<Article> {
    self.pipeline().save_article(article).await
  }

  /// Runs a free-text search and ingests up to `cap` of its results.
  ///
  /// Unlike [`run_batch`](Ingestor::run_batch), a failed search is returned as an error.
  pub async fn search_and_ingest(&self, query: &str, cap: usize) -> Result<Vec<Article>> {
    let response = self.batch.search().search_articles(query, self.request_size(cap)).await?;
    self.pipeline().ingest(&response.organic_results, cap).await
  }

  /// Ingests up to `cap` works citing the stored article `article_id`.
  pub async fn ingest_cited_by(&self, article_id: i64, cap: usize) -> Result<Vec<Article>> {
    let article = Query::by_id(article_id)
      .execute(&self.database)
      .await?
      .into_iter()
      .next()
      .ok_or(ScholarError::NotFound { entity: "article", id: article_id })?;

    let citing_set_id = article.citing_set_id.ok_or_else(|| {
      ScholarError::InvalidInput(format!("article {article_id} has no known citing works"))
    })?;

    let response =
      self.batch.search().search_citing(&citing_set_id, self.request_size(cap)).await?;
    self.pipeline().ingest(&response.organic_results, cap).await
  }

  /// Results to request from the search backend for a given cap.
  fn request_size(&self, cap: usize) -> usize { cap.min(self.config.search.max_results) }
}

#[async_trait]
impl Ingestor for Scholar {
  async fn ingest(&self, results: &[RawSearchResult], cap: usize) -> Result<Vec<Article>> {
    self.pipeline().ingest(results, cap).await
  }

  async fn run_batch(&self, queries: &[String], per_query_cap: usize) -> Vec<Article> {
    self.batch.run(queries, per_query_cap).await
  }
}
