//! Running the ingestion pipeline over a list of researcher queries.
//!
//! Each query is searched and ingested on its own. A query whose search or ingestion fails is
//! logged and contributes nothing, and the remaining queries still run. Results are concatenated
//! in query order.

use tracing::Instrument;

use super::*;

/// Searches for researchers one after another and ingests their works.
#[derive(Clone)]
pub struct Batch {
  /// Source of search results
  search:   Arc<dyn ScholarSearch>,
  /// Where results are ingested
  pipeline: Pipeline,
}

impl Batch {
  /// Creates an orchestrator over a search backend and a pipeline.
  pub fn new(search: Arc<dyn ScholarSearch>, pipeline: Pipeline) -> Self {
    Self { search, pipeline }
  }

  /// The pipeline results are ingested through.
  pub fn pipeline(&self) -> &Pipeline { &self.pipeline }

  /// The search backend queries are sent to.
  pub fn search(&self) -> &dyn ScholarSearch { self.search.as_ref() }

  /// Searches every query as a researcher name and ingests up to `per_query_cap` works each.
  ///
  /// When a search yields several researcher profiles, only the first one's publications are
  /// used. Never fails: whatever could be collected is returned, possibly nothing. A zero cap
  /// returns nothing without searching.
  pub async fn run(&self, queries: &[String], per_query_cap: usize) -> Vec<Article> {
    if per_query_cap == 0 {
      warn!(queries = queries.len(), "Per-query cap must be at least 1, skipping batch");
      return Vec::new();
    }
    info!(queries = queries.len(), per_query_cap, "Starting batch");

    let mut collected = Vec::new();
    let mut failed = 0;
    for (index, query) in queries.iter().enumerate() {
      let span = info_span!("query", index, query = %query);
      match self.run_query(query, per_query_cap).instrument(span).await {
        Ok(articles) => {
          info!(index, %query, count = articles.len(), "Query ingested");
          collected.extend(articles);
        },
        Err(error) => {
          failed += 1;
          error!(index, %query, %error, "Query failed, moving on");
        },
      }
    }

    info!(total = collected.len(), failed, "Finished batch");
    collected
  }

  async fn run_query(&self, query: &str, per_query_cap: usize) -> Result<Vec<Article>> {
    let response = self.search.search_by_author(query, per_query_cap).await?;
    let Some(works) = response.first_match() else {
      info!("No matching researcher");
      return Ok(Vec::new());
    };

    let bounded = &works[..works.len().min(per_query_cap)];
    self.pipeline.ingest(bounded, per_query_cap).await
  }
}

impl std::fmt::Debug for Batch {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Batch").field("pipeline", &self.pipeline).finish_non_exhaustive()
  }
}
