//! The ingestion pipeline: raw search results in, stored and linked articles out.
//!
//! For every raw result, up to the caller's cap, [`Pipeline::ingest`]:
//!
//! 1. normalizes it into a candidate [`Article`]
//! 2. acquires a storage handle for the record's unit of work
//! 3. skips the candidate if it fails [`Article::validate`]
//! 4. returns the stored article unchanged if one with the same external id already exists
//! 5. otherwise inserts it, then derives its authors: each parsed name is upserted, linked at its
//!    position, and has its running counters incremented
//!
//! Failures are contained at the smallest possible scope. A storage failure loses one record,
//! and a failure while attaching one author loses only that author. Neither aborts the batch.
//!
//! The counter update is a read followed by a write. Within one pipeline, updates for the same
//! author name are serialized by a per-name lock held across upsert, link and counter update.
//! Separate processes writing to the same database can still lose increments.

use super::*;

pub mod locks;

pub use self::locks::KeyedLocks;

/// What happened to one raw result.
#[derive(Debug)]
enum Outcome {
  /// Newly stored
  Persisted(Article),
  /// Already stored under the same external id
  Duplicate(Article),
  /// Rejected by validation
  Skipped {
    /// The rejected candidate
    candidate: Article,
    /// Why it was rejected
    reason:    ValidationError,
  },
  /// Lost to a storage failure
  Failed {
    /// The candidate that could not be stored
    candidate: Article,
    /// The storage failure
    error:     ScholarError,
  },
}

/// Result of writing one valid candidate.
enum Stored {
  /// A new row was inserted
  New(Article),
  /// A row with the same external id already existed
  Existing(Article),
}

/// Normalizes, validates, deduplicates and stores search results.
///
/// Cloning is cheap; clones share the database and the per-author locks.
#[derive(Debug, Clone)]
pub struct Pipeline {
  /// Where articles and authors are written
  db:           Database,
  /// Serializes counter updates per author name
  author_locks: Arc<KeyedLocks>,
}

impl Pipeline {
  /// Creates a pipeline writing to `db`.
  pub fn new(db: Database) -> Self { Self { db, author_locks: Arc::new(KeyedLocks::new()) } }

  /// The database this pipeline writes to.
  pub fn database(&self) -> &Database { &self.db }

  /// Ingests at most `cap` results, in order.
  ///
  /// Returns the newly stored and the already-known articles, in the relative order of their raw
  /// results. Skipped and failed records are logged and left out. The only error is a violated
  /// precondition: `cap` must be at least 1.
  pub async fn ingest(&self, results: &[RawSearchResult], cap: usize) -> Result<Vec<Article>> {
    if cap == 0 {
      return Err(ScholarError::InvalidInput("ingestion cap must be at least 1".into()));
    }

    let limit = results.len().min(cap);
    info!(received = results.len(), cap, "Ingesting search results");

    let mut collected = Vec::with_capacity(limit);
    let (mut persisted, mut duplicates, mut skipped, mut failed) = (0, 0, 0, 0);

    for (index, raw) in results.iter().take(limit).enumerate() {
      match self.ingest_record(raw).await {
        Outcome::Persisted(article) => {
          persisted += 1;
          collected.push(article);
        },
        Outcome::Duplicate(article) => {
          debug!(index, id = ?article.id, external_id = ?article.external_id, "Already stored");
          duplicates += 1;
          collected.push(article);
        },
        Outcome::Skipped { candidate, reason } => {
          warn!(
            index,
            external_id = ?candidate.external_id,
            title = %candidate.title,
            %reason,
            "Skipping invalid search result"
          );
          skipped += 1;
        },
        Outcome::Failed { candidate, error } => {
          error!(
            index,
            external_id = ?candidate.external_id,
            title = %candidate.title,
            %error,
            "Failed to store search result"
          );
          failed += 1;
        },
      }
    }

    info!(persisted, duplicates, skipped, failed, "Finished ingesting search results");
    Ok(collected)
  }

  /// Stores one article outside of a batch.
  ///
  /// Unlike [`ingest`](Self::ingest), failures surface to the caller: an invalid article is a
  /// [`ScholarError::Validation`] and a failed insert is a storage error. A duplicate resolves to
  /// the stored row. Failures while attaching individual authors are still only logged.
  pub async fn save_article(&self, article: Article) -> Result<Article> {
    article.validate()?;
    let handle = self.db.acquire().await?;
    let article = match self.persist(&handle, article).await? {
      Stored::New(article) => {
        self.derive_authors(&handle, &article).await;
        article
      },
      Stored::Existing(article) => article,
    };
    handle.release().await?;
    Ok(article)
  }

  async fn ingest_record(&self, raw: &RawSearchResult) -> Outcome {
    let candidate = Article::normalize(raw);

    let handle = match self.db.acquire().await {
      Ok(handle) => handle,
      Err(error) => return Outcome::Failed { candidate, error },
    };

    let outcome = match candidate.validate() {
      Err(reason) => Outcome::Skipped { candidate, reason },
      Ok(()) => match self.persist(&handle, candidate.clone()).await {
        Ok(Stored::New(article)) => {
          self.derive_authors(&handle, &article).await;
          Outcome::Persisted(article)
        },
        Ok(Stored::Existing(article)) => Outcome::Duplicate(article),
        Err(error) => Outcome::Failed { candidate, error },
      },
    };

    if let Err(error) = handle.release().await {
      warn!(%error, "Failed to release storage connection");
    }
    outcome
  }

  /// Inserts a valid candidate unless its external id is already stored.
  async fn persist(&self, handle: &Handle, candidate: Article) -> Result<Stored> {
    if let Some(external_id) = candidate.external_id.as_deref() {
      if let Some(existing) = handle.find_by_external_id(external_id).await? {
        return Ok(Stored::Existing(existing));
      }
    }
    Ok(Stored::New(handle.insert_article(&candidate).await?))
  }

  /// Upserts, links and counts every author of a freshly stored article.
  async fn derive_authors(&self, handle: &Handle, article: &Article) {
    let Some(article_id) = article.id else {
      return;
    };
    let list = AuthorList::split(&article.authors);
    if list.truncated {
      debug!(article_id, kept = list.len(), "Author list was truncated upstream");
    }

    for (position, name) in list.into_iter().enumerate() {
      if let Err(error) =
        self.attach_author(handle, article_id, article.citation_count, position, &name).await
      {
        warn!(article_id, author = %name, position, %error, "Failed to attach author");
      }
    }
  }

  async fn attach_author(
    &self,
    handle: &Handle,
    article_id: i64,
    citations: i64,
    position: usize,
    name: &str,
  ) -> Result<()> {
    let _guard = self.author_locks.lock(name).await;

    let author = handle.upsert_author_by_name(name).await?;
    let created = handle.link_author_to_article(article_id, author.id, position).await?;

    // A name repeated within one author list links once and counts once.
    if created {
      let counters = handle.read_author_counters(author.id).await?;
      handle.write_author_counters(author.id, counters.with_article(citations)).await?;
    }
    Ok(())
  }
}
