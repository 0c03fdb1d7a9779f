//! Soft deletion of articles and authors.
//!
//! Nothing is ever erased: removal stamps `deleted_at`, after which the row is invisible to
//! queries, deduplication and counter updates.
//!
//! Removing an article also takes it out of the running statistics of every author linked to
//! it. The stamp and the counter updates happen in one transaction, so an author's counters keep
//! summing over exactly the non-deleted articles linked to it.
//!
//! ```no_run
//! use scholar::{
//!   database::{Database, Remove},
//!   prelude::*,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::open("scholar.db").await?;
//!
//! // Preview
//! let would_remove = Remove::article(42).dry_run().execute(&db).await?;
//!
//! if would_remove == 1 {
//!   Remove::article(42).execute(&db).await?;
//! }
//! # Ok(())
//! # }
//! ```

use super::*;

/// What a [`Remove`] instruction targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
  /// An article row id
  Article(i64),
  /// An author row id
  Author(i64),
}

/// Instruction that soft-deletes one article or one author.
///
/// The output is the number of rows that were (or, in a dry run, would be) removed: `0` when the
/// target does not exist or was already removed, `1` otherwise.
#[derive(Debug, Clone)]
pub struct Remove {
  /// The row to remove
  target:  Target,
  /// When true, report what would be removed without writing anything
  dry_run: bool,
}

impl Remove {
  /// Removes an article and rolls its contribution back out of its authors' counters.
  pub fn article(id: i64) -> Self { Self { target: Target::Article(id), dry_run: false } }

  /// Removes an author. Links and articles are left as they are.
  pub fn author(id: i64) -> Self { Self { target: Target::Author(id), dry_run: false } }

  /// Enables dry run mode.
  pub fn dry_run(mut self) -> Self {
    self.dry_run = true;
    self
  }
}

#[async_trait]
impl DatabaseInstruction for Remove {
  type Output = usize;

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let target = self.target;
    let dry_run = self.dry_run;

    let handle = db.acquire().await?;
    let removed = handle
      .connection()
      .call(move |conn| {
        let now = Utc::now();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let removed = match target {
          Target::Article(id) => {
            let citations: Option<i64> = tx
              .query_row(
                "SELECT citation_count FROM articles WHERE id = ?1 AND deleted_at IS NULL",
                [id],
                |row| row.get(0),
              )
              .optional()?;

            match citations {
              Some(_) if dry_run => 1,
              Some(citations) => {
                tx.execute(
                  "UPDATE articles SET deleted_at = ?2, updated_at = ?2 WHERE id = ?1",
                  params![id, now],
                )?;
                tx.execute(
                  "UPDATE authors SET
                     article_count = max(article_count - 1, 0),
                     total_citations = max(total_citations - ?2, 0),
                     last_updated = ?3
                   WHERE deleted_at IS NULL
                     AND id IN (SELECT author_id FROM article_authors WHERE article_id = ?1)",
                  params![id, citations, now],
                )?;
                1
              },
              None => 0,
            }
          },
          Target::Author(id) if dry_run => tx.query_row(
            "SELECT COUNT(*) FROM authors WHERE id = ?1 AND deleted_at IS NULL",
            [id],
            |row| row.get::<_, i64>(0),
          )? as usize,
          Target::Author(id) => tx.execute(
            "UPDATE authors SET deleted_at = ?2, last_updated = ?2 WHERE id = ?1 AND deleted_at IS NULL",
            params![id, now],
          )?,
        };

        tx.commit()?;
        Ok(removed)
      })
      .await?;
    handle.release().await?;

    if dry_run {
      info!(removal = ?self.target, removed, "Dry run, nothing was removed");
    } else {
      info!(removal = ?self.target, removed, "Removed");
    }
    Ok(removed)
  }
}
