//! Storage operations on an admitted [`Handle`].
//!
//! These are the primitives the ingestion pipeline composes. Each one is a single round trip to
//! the connection's background thread. None of them is atomic with respect to the others.

use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};

use super::*;

/// Column list matching [`article_from_row`].
pub(crate) const ARTICLE_COLUMNS: &str = "a.id, a.title, a.authors, a.publication_year, a.venue, \
                                          a.url, a.abstract_snippet, a.external_id, \
                                          a.citation_count, a.citing_set_id, a.pdf_url, \
                                          a.publisher, a.created_at, a.updated_at, a.deleted_at";

/// Column list matching [`author_from_row`].
pub(crate) const AUTHOR_COLUMNS: &str = "au.id, au.full_name, au.article_count, \
                                         au.total_citations, au.first_seen, au.last_updated, \
                                         au.deleted_at";

/// Maps a row selected with [`ARTICLE_COLUMNS`].
pub(crate) fn article_from_row(row: &Row<'_>) -> rusqlite::Result<Article> {
  Ok(Article {
    id:               Some(row.get(0)?),
    title:            row.get(1)?,
    authors:          row.get(2)?,
    publication_year: row.get(3)?,
    venue:            row.get(4)?,
    url:              row.get(5)?,
    abstract_snippet: row.get(6)?,
    external_id:      row.get(7)?,
    citation_count:   row.get(8)?,
    citing_set_id:    row.get(9)?,
    pdf_url:          row.get(10)?,
    publisher:        row.get(11)?,
    created_at:       row.get(12)?,
    updated_at:       row.get(13)?,
    deleted_at:       row.get(14)?,
  })
}

/// Maps a row selected with [`AUTHOR_COLUMNS`].
pub(crate) fn author_from_row(row: &Row<'_>) -> rusqlite::Result<Author> {
  Ok(Author {
    id:              row.get(0)?,
    full_name:       row.get(1)?,
    article_count:   row.get(2)?,
    total_citations: row.get(3)?,
    first_seen:      row.get(4)?,
    last_updated:    row.get(5)?,
    deleted_at:      row.get(6)?,
  })
}

impl Handle {
  /// Inserts a new article row and returns it as stored, with its id and timestamps set.
  pub async fn insert_article(&self, article: &Article) -> Result<Article> {
    let mut stored = article.clone();
    let now = Utc::now();
    stored.created_at = now;
    stored.updated_at = now;
    stored.deleted_at = None;

    let row = stored.clone();
    let id = self
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "INSERT INTO articles (
             title, authors, publication_year, venue, url, abstract_snippet, external_id,
             citation_count, citing_set_id, pdf_url, publisher, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        )?;
        stmt.execute(params![
          row.title,
          row.authors,
          row.publication_year,
          row.venue,
          row.url,
          row.abstract_snippet,
          row.external_id,
          row.citation_count,
          row.citing_set_id,
          row.pdf_url,
          row.publisher,
          row.created_at,
          row.updated_at,
        ])?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    stored.id = Some(id);
    debug!(id, title = %stored.title, "Inserted article");
    Ok(stored)
  }

  /// Finds the non-deleted article with the given upstream id.
  pub async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Article>> {
    let external_id = external_id.to_string();
    let article = self
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&format!(
          "SELECT {ARTICLE_COLUMNS} FROM articles a
           WHERE a.external_id = ?1 AND a.deleted_at IS NULL
           ORDER BY a.id LIMIT 1"
        ))?;
        Ok(stmt.query_row([external_id], article_from_row).optional()?)
      })
      .await?;
    Ok(article)
  }

  /// Finds the non-deleted article with the given row id.
  pub async fn find_article(&self, id: i64) -> Result<Option<Article>> {
    let article = self
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&format!(
          "SELECT {ARTICLE_COLUMNS} FROM articles a WHERE a.id = ?1 AND a.deleted_at IS NULL"
        ))?;
        Ok(stmt.query_row([id], article_from_row).optional()?)
      })
      .await?;
    Ok(article)
  }

  /// Returns the non-deleted author with exactly this name, creating it with zero counters if
  /// there is none.
  pub async fn upsert_author_by_name(&self, full_name: &str) -> Result<Author> {
    let full_name = full_name.to_string();
    let author = self
      .connection()
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let existing = tx
          .prepare_cached(&format!(
            "SELECT {AUTHOR_COLUMNS} FROM authors au
             WHERE au.full_name = ?1 AND au.deleted_at IS NULL
             ORDER BY au.id LIMIT 1"
          ))?
          .query_row([&full_name], author_from_row)
          .optional()?;

        let author = match existing {
          Some(author) => author,
          None => {
            let now = Utc::now();
            tx.prepare_cached(
              "INSERT INTO authors (full_name, article_count, total_citations, first_seen, \
               last_updated) VALUES (?1, 0, 0, ?2, ?2)",
            )?
            .execute(params![full_name, now])?;
            Author {
              id: tx.last_insert_rowid(),
              full_name,
              article_count: 0,
              total_citations: 0,
              first_seen: now,
              last_updated: now,
              deleted_at: None,
            }
          },
        };
        tx.commit()?;
        Ok(author)
      })
      .await?;

    trace!(id = author.id, name = %author.full_name, "Upserted author");
    Ok(author)
  }

  /// Links an author to an article at `position`, overwriting the position of an existing link.
  ///
  /// Returns `true` when the link did not exist before.
  pub async fn link_author_to_article(
    &self,
    article_id: i64,
    author_id: i64,
    position: usize,
  ) -> Result<bool> {
    let position = i64::try_from(position)
      .map_err(|_| ScholarError::InvalidInput(format!("author position {position} is too large")))?;

    let created = self
      .connection()
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let existed = tx
          .prepare_cached("SELECT 1 FROM article_authors WHERE article_id = ?1 AND author_id = ?2")?
          .exists(params![article_id, author_id])?;
        tx.prepare_cached(
          "INSERT INTO article_authors (article_id, author_id, position) VALUES (?1, ?2, ?3)
           ON CONFLICT (article_id, author_id) DO UPDATE SET position = excluded.position",
        )?
        .execute(params![article_id, author_id, position])?;
        tx.commit()?;
        Ok(!existed)
      })
      .await?;

    trace!(article_id, author_id, position, created, "Linked author to article");
    Ok(created)
  }

  /// Reads an author's running counters.
  pub async fn read_author_counters(&self, author_id: i64) -> Result<AuthorCounters> {
    let counters = self
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT article_count, total_citations FROM authors WHERE id = ?1 AND deleted_at IS NULL",
        )?;
        Ok(
          stmt
            .query_row([author_id], |row| {
              Ok(AuthorCounters { article_count: row.get(0)?, total_citations: row.get(1)? })
            })
            .optional()?,
        )
      })
      .await?;
    counters.ok_or(ScholarError::NotFound { entity: "author", id: author_id })
  }

  /// Overwrites an author's running counters.
  pub async fn write_author_counters(&self, author_id: i64, counters: AuthorCounters) -> Result<()> {
    let updated = self
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "UPDATE authors SET article_count = ?2, total_citations = ?3, last_updated = ?4
           WHERE id = ?1 AND deleted_at IS NULL",
        )?;
        Ok(stmt.execute(params![
          author_id,
          counters.article_count,
          counters.total_citations,
          Utc::now()
        ])?)
      })
      .await?;

    if updated == 0 {
      return Err(ScholarError::NotFound { entity: "author", id: author_id });
    }
    Ok(())
  }

  /// Refreshes an article's `updated_at` without touching any other field.
  pub async fn touch_article(&self, id: i64) -> Result<()> {
    let updated = self
      .connection()
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE articles SET updated_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
          params![id, Utc::now()],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(ScholarError::NotFound { entity: "article", id });
    }
    Ok(())
  }
}
