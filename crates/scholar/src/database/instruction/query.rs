//! Article queries.
//!
//! A [`Query`] is a conjunction of [`QueryCriteria`] with optional ordering and limit. Soft-deleted
//! articles never match.

use super::*;

/// One condition an article has to satisfy.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryCriteria {
  /// Row id
  Id(i64),
  /// Upstream identifier
  ExternalId(String),
  /// Case-insensitive substring of the title
  Title(String),
  /// Linked to an author with exactly this name
  Author(String),
  /// Published in this year
  Year(i32),
  /// Strictly more citations than this
  CitedMoreThan(i64),
  /// Every article
  All,
}

/// Available fields for ordering query results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
  /// Order by title
  Title,
  /// Order by publication year
  Year,
  /// Order by citation count
  Citations,
  /// Order by insertion time
  Created,
}

impl OrderField {
  fn as_sql_str(&self) -> &'static str {
    match self {
      OrderField::Title => "a.title",
      OrderField::Year => "a.publication_year",
      OrderField::Citations => "a.citation_count",
      OrderField::Created => "a.id",
    }
  }
}

/// A query for retrieving articles from the database
#[derive(Debug, Clone)]
pub struct Query {
  criteria:   Vec<QueryCriteria>,
  order_by:   Option<OrderField>,
  descending: bool,
  limit:      Option<usize>,
}

impl Query {
  /// Creates a new query with the given criteria
  pub fn new(criteria: QueryCriteria) -> Self {
    Self { criteria: vec![criteria], order_by: None, descending: false, limit: None }
  }

  /// Creates a query for one article by row id
  pub fn by_id(id: i64) -> Self { Self::new(QueryCriteria::Id(id)) }

  /// Creates a query for one article by upstream identifier
  pub fn by_external_id(external_id: impl Into<String>) -> Self {
    Self::new(QueryCriteria::ExternalId(external_id.into()))
  }

  /// Creates a title keyword query
  pub fn title(keyword: impl Into<String>) -> Self { Self::new(QueryCriteria::Title(keyword.into())) }

  /// Creates a query for articles linked to an author
  pub fn by_author(name: impl Into<String>) -> Self { Self::new(QueryCriteria::Author(name.into())) }

  /// Creates a query for articles published in `year`
  pub fn by_year(year: i32) -> Self { Self::new(QueryCriteria::Year(year)) }

  /// Creates a query for articles with more than `citations` citations
  pub fn cited_more_than(citations: i64) -> Self {
    Self::new(QueryCriteria::CitedMoreThan(citations))
  }

  /// Creates a query that returns all articles
  pub fn list_all() -> Self { Self::new(QueryCriteria::All) }

  /// Adds another condition
  pub fn and(mut self, criteria: QueryCriteria) -> Self {
    self.criteria.push(criteria);
    self
  }

  /// Sets the field to order results by
  pub fn order_by(mut self, field: OrderField) -> Self {
    self.order_by = Some(field);
    self
  }

  /// Sets the order to descending (default is ascending)
  pub fn descending(mut self) -> Self {
    self.descending = true;
    self
  }

  /// Caps the number of returned articles
  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }

  fn build_sql(&self) -> (String, Vec<Value>) {
    let mut clauses = vec!["a.deleted_at IS NULL".to_string()];
    let mut params = Vec::new();

    for criteria in &self.criteria {
      let clause = match criteria {
        QueryCriteria::Id(id) => {
          params.push(Value::Integer(*id));
          "a.id = ?"
        },
        QueryCriteria::ExternalId(external_id) => {
          params.push(Value::Text(external_id.clone()));
          "a.external_id = ?"
        },
        QueryCriteria::Title(keyword) => {
          params.push(Value::Text(keyword.to_lowercase()));
          "instr(lower(a.title), ?) > 0"
        },
        QueryCriteria::Author(name) => {
          params.push(Value::Text(name.clone()));
          "a.id IN (SELECT l.article_id FROM article_authors l
                    JOIN authors au ON au.id = l.author_id
                    WHERE au.full_name = ? AND au.deleted_at IS NULL)"
        },
        QueryCriteria::Year(year) => {
          params.push(Value::Integer(i64::from(*year)));
          "a.publication_year = ?"
        },
        QueryCriteria::CitedMoreThan(citations) => {
          params.push(Value::Integer(*citations));
          "a.citation_count > ?"
        },
        QueryCriteria::All => continue,
      };
      clauses.push(clause.to_string());
    }

    let direction = if self.descending { "DESC" } else { "ASC" };
    let order = match self.order_by {
      Some(field) => format!("{} {direction}, a.id ASC", field.as_sql_str()),
      None => "a.id ASC".to_string(),
    };

    let mut sql = format!(
      "SELECT {ARTICLE_COLUMNS} FROM articles a WHERE {} ORDER BY {order}",
      clauses.join(" AND ")
    );
    if let Some(limit) = self.limit {
      sql.push_str(&format!(" LIMIT {limit}"));
    }
    (sql, params)
  }
}

#[async_trait]
impl DatabaseInstruction for Query {
  type Output = Vec<Article>;

  async fn execute(&self, db: &Database) -> Result<Self::Output> {
    let (sql, params) = self.build_sql();
    trace!(%sql, "Running article query");

    let handle = db.acquire().await?;
    let articles = handle
      .connection()
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&sql)?;
        let articles = stmt
          .query_map(params_from_iter(params), article_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(articles)
      })
      .await?;
    handle.release().await?;

    debug!(count = articles.len(), "Article query returned");
    Ok(articles)
  }
}
