//! Author queries.

use super::*;

/// Which authors to return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorCriteria {
  /// The author with exactly this name
  Name(String),
  /// Authors whose name contains this text, case-insensitively
  NameContains(String),
  /// The `n` authors with the most citations
  TopByCitations(usize),
  /// The `n` authors with the most articles
  TopByArticles(usize),
  /// Authors of an article, in author-list order
  OfArticle(i64),
}

/// A query for retrieving authors. Soft-deleted authors never match.
#[derive(Debug, Clone)]
pub struct AuthorQuery {
  criteria: AuthorCriteria,
}

impl AuthorQuery {
  /// Creates a query from explicit criteria
  pub fn new(criteria: AuthorCriteria) -> Self { Self { criteria } }

  /// Looks up one author by exact name
  pub fn by_name(name: impl Into<String>) -> Self { Self::new(AuthorCriteria::Name(name.into())) }

  /// Finds authors whose names contain `pattern`
  pub fn name_contains(pattern: impl Into<String>) -> Self {
    Self::new(AuthorCriteria::NameContains(pattern.into()))
  }

  /// The `n` most cited authors
  pub fn top_by_citations(n: usize) -> Self { Self::new(AuthorCriteria::TopByCitations(n)) }

  /// The `n` authors with the most articles
  pub fn top_by_articles(n: usize) -> Self { Self::new(AuthorCriteria::TopByArticles(n)) }

  /// The authors of one article, ordered by their position in its author list
  pub fn of_article(article_id: i64) -> Self { Self::new(AuthorCriteria::OfArticle(article_id)) }

  fn build_sql(&self) -> (String, Vec<Value>) {
    let select = format!("SELECT {AUTHOR_COLUMNS} FROM authors au");
    match &self.criteria {
      AuthorCriteria::Name(name) => (
        format!("{select} WHERE au.full_name = ? AND au.deleted_at IS NULL ORDER BY au.id"),
        vec![Value::Text(name.clone())],
      ),
      AuthorCriteria::NameContains(pattern) => (
        format!(
          "{select} WHERE instr(lower(au.full_name), ?) > 0 AND au.deleted_at IS NULL
           ORDER BY au.full_name, au.id"
        ),
        vec![Value::Text(pattern.to_lowercase())],
      ),
      AuthorCriteria::TopByCitations(n) => (
        format!(
          "{select} WHERE au.deleted_at IS NULL AND au.article_count > 0
           ORDER BY au.total_citations DESC, au.id ASC LIMIT {n}"
        ),
        Vec::new(),
      ),
      AuthorCriteria::TopByArticles(n) => (
        format!(
          "{select} WHERE au.deleted_at IS NULL AND au.article_count > 0
           ORDER BY au.article_count DESC, au.total_citations DESC, au.id ASC LIMIT {n}"
        ),
        Vec::new(),
      ),
      AuthorCriteria::OfArticle(article_id) => (
        format!(
          "{select} JOIN article_authors l ON l.author_id = au.id
           WHERE l.article_id = ? AND au.deleted_at IS NULL
           ORDER BY l.position, au.id"
        ),
        vec![Value::Integer(*article_id)],
      ),
    }
  }
}

#[async_trait]
impl DatabaseInstruction for AuthorQuery {
  type Output = Vec<Author>;

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let (sql, params) = self.build_sql();
    let handle = db.acquire().await?;
    let authors = handle
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&sql)?;
        let authors = stmt
          .query_map(params_from_iter(params), author_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(authors)
      })
      .await?;
    handle.release().await?;
    debug!(criteria = ?self.criteria, count = authors.len(), "Author query returned");
    Ok(authors)
  }
}
