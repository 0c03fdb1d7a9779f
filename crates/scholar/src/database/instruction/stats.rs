//! Storage-wide counts.

use super::*;

/// Counts over the non-deleted rows of the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStats {
  /// Stored articles
  pub articles:        i64,
  /// Known authors
  pub authors:         i64,
  /// Article-author links between non-deleted rows
  pub links:           i64,
  /// Sum of the citation counts of stored articles
  pub total_citations: i64,
}

/// Instruction that computes [`StorageStats`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Stats;

#[async_trait]
impl DatabaseInstruction for Stats {
  type Output = StorageStats;

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let handle = db.acquire().await?;
    let stats = handle
      .connection()
      .call(|conn| {
        let (articles, total_citations): (i64, i64) = conn.query_row(
          "SELECT COUNT(*), COALESCE(SUM(citation_count), 0) FROM articles WHERE deleted_at IS NULL",
          [],
          |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let authors: i64 =
          conn.query_row("SELECT COUNT(*) FROM authors WHERE deleted_at IS NULL", [], |row| {
            row.get(0)
          })?;
        let links: i64 = conn.query_row(
          "SELECT COUNT(*) FROM article_authors l
           JOIN articles a ON a.id = l.article_id
           JOIN authors au ON au.id = l.author_id
           WHERE a.deleted_at IS NULL AND au.deleted_at IS NULL",
          [],
          |row| row.get(0),
        )?;
        Ok(StorageStats { articles, authors, links, total_citations })
      })
      .await?;
    handle.release().await?;
    debug!(?stats, "Computed storage stats");
    Ok(stats)
  }
}
