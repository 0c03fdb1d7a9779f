//! Article and author records, and the normalization of raw search results into articles.
//!
//! An [`Article`] is built from a [`RawSearchResult`] with [`Article::normalize`], which never
//! fails: missing upstream fields degrade to documented defaults. Whether the resulting candidate
//! may be stored is a separate question answered by [`Article::validate`].
//!
//! ```
//! use scholar::{article::Article, search::RawSearchResult};
//!
//! let raw: RawSearchResult = serde_json::from_str(
//!   r#"{
//!     "title": "Population biology of plants",
//!     "result_id": "QvOS0mbsaN8J",
//!     "publication_info": {
//!       "summary": "JL Harper - Population biology of plants., 1977 - cabdirect.org"
//!     },
//!     "inline_links": { "cited_by": { "total": 16131, "cites_id": "16055614372148427706" } }
//!   }"#,
//! )
//! .unwrap();
//!
//! let article = Article::normalize(&raw);
//! assert_eq!(article.authors, "JL Harper");
//! assert_eq!(article.publication_year, Some(1977));
//! assert_eq!(article.citation_count, 16131);
//! assert!(article.validate().is_ok());
//! ```

use super::*;

/// Title used when a raw result carries none.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Oldest accepted publication year.
pub const MIN_PUBLICATION_YEAR: i32 = 1900;

lazy_static! {
  static ref EXTERNAL_ID: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// Newest accepted publication year: next calendar year, to allow for early releases.
pub fn max_publication_year() -> i32 { Utc::now().year() + 1 }

/// Whether `id` is usable as an upstream identity key.
pub fn is_valid_external_id(id: &str) -> bool { EXTERNAL_ID.is_match(id) }

/// A scholarly work as stored locally.
///
/// Equality follows record identity rather than field equality: two articles that both carry an
/// external id are equal exactly when the ids match, otherwise the `(title, authors)` pair decides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
  /// Row id, set once the article has been stored
  pub id:               Option<i64>,
  /// Title of the work
  pub title:            String,
  /// Raw display string of the authors
  pub authors:          String,
  /// Year of publication, when known
  pub publication_year: Option<i32>,
  /// Journal, conference or book
  pub venue:            String,
  /// Landing page of the work
  pub url:              Option<String>,
  /// Short excerpt of the work's text
  pub abstract_snippet: Option<String>,
  /// Upstream identifier, the deduplication key when present
  pub external_id:      Option<String>,
  /// Number of citing works reported upstream
  pub citation_count:   i64,
  /// Upstream id of the set of citing works
  pub citing_set_id:    Option<String>,
  /// Direct link to a PDF of the work
  pub pdf_url:          Option<String>,
  /// Hosting site or publisher
  pub publisher:        String,
  /// When the row was first written
  pub created_at:       DateTime<Utc>,
  /// When the row was last refreshed
  pub updated_at:       DateTime<Utc>,
  /// When the row was soft-deleted, if it was
  pub deleted_at:       Option<DateTime<Utc>>,
}

impl Article {
  /// Creates an unsaved article with the given title and authors and default metadata.
  pub fn new(title: impl Into<String>, authors: impl Into<String>) -> Self {
    let now = Utc::now();
    Self {
      id:               None,
      title:            title.into(),
      authors:          authors.into(),
      publication_year: None,
      venue:            UNKNOWN_SOURCE.to_string(),
      url:              None,
      abstract_snippet: None,
      external_id:      None,
      citation_count:   0,
      citing_set_id:    None,
      pdf_url:          None,
      publisher:        UNKNOWN_PUBLISHER.to_string(),
      created_at:       now,
      updated_at:       now,
      deleted_at:       None,
    }
  }

  /// Sets the upstream identifier.
  pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
    self.external_id = Some(external_id.into());
    self
  }

  /// Sets the publication year.
  pub fn with_year(mut self, year: i32) -> Self {
    self.publication_year = Some(year);
    self
  }

  /// Sets the citation counter.
  pub fn with_citations(mut self, citation_count: i64) -> Self {
    self.citation_count = citation_count;
    self
  }

  /// Sets the venue.
  pub fn with_venue(mut self, venue: impl Into<String>) -> Self {
    self.venue = venue.into();
    self
  }

  /// Builds a candidate article from one raw search result.
  ///
  /// - `title` is taken as-is (whitespace-normalized), or [`UNKNOWN_TITLE`] when absent
  /// - `external_id` is kept only when it matches `[A-Za-z0-9_-]+`
  /// - authors, venue, year and publisher come from [`PublicationSummary::parse`]
  /// - citation count and citing set id come from the inline citation block, or `(0, None)`
  /// - `pdf_url` is the first resource whose format is PDF
  ///
  /// Years the summary parser accepts but that fall outside the storable window are dropped.
  pub fn normalize(raw: &RawSearchResult) -> Self {
    let summary = PublicationSummary::parse(raw.summary().unwrap_or_default());

    let title = raw.title.as_deref().map_or_else(|| UNKNOWN_TITLE.to_string(), normalize_whitespace);

    let external_id = raw.result_id.as_deref().filter(|id| {
      let valid = is_valid_external_id(id);
      if !valid {
        debug!(result_id = %id, "Discarding malformed upstream result id");
      }
      valid
    });

    let (citation_count, citing_set_id) = raw.cited_by().map_or((0, None), |cited_by| {
      (cited_by.total.unwrap_or_default(), cited_by.cites_id.clone())
    });

    let publication_year = summary.year.filter(|year| {
      let plausible = (MIN_PUBLICATION_YEAR..=max_publication_year()).contains(year);
      if !plausible {
        debug!(year, %title, "Dropping implausible publication year");
      }
      plausible
    });

    let mut article = Self::new(title, summary.authors);
    article.publication_year = publication_year;
    article.venue = summary.venue;
    article.publisher = summary.publisher;
    article.url = raw.link.clone();
    article.abstract_snippet = raw.snippet.clone();
    article.external_id = external_id.map(str::to_string);
    article.citation_count = citation_count;
    article.citing_set_id = citing_set_id;
    article.pdf_url = raw.pdf_link().map(str::to_string);

    trace!(?article, "Normalized raw search result");
    article
  }

  /// Checks whether the article may be stored.
  ///
  /// Title and authors must be non-blank, the year (if any) must lie within
  /// `1900..=current_year + 1`, the citation counter must not be negative, and the external id
  /// (if any) must be well formed.
  pub fn validate(&self) -> core::result::Result<(), ValidationError> {
    if self.title.trim().is_empty() {
      return Err(ValidationError::MissingTitle);
    }
    if self.authors.trim().is_empty() {
      return Err(ValidationError::MissingAuthors);
    }
    if let Some(year) = self.publication_year {
      let max = max_publication_year();
      if !(MIN_PUBLICATION_YEAR..=max).contains(&year) {
        return Err(ValidationError::YearOutOfRange { year, min: MIN_PUBLICATION_YEAR, max });
      }
    }
    if self.citation_count < 0 {
      return Err(ValidationError::NegativeCitations(self.citation_count));
    }
    if let Some(id) = self.external_id.as_deref() {
      if !is_valid_external_id(id) {
        return Err(ValidationError::MalformedExternalId(id.to_string()));
      }
    }
    Ok(())
  }

  /// Whether the authors string is the parser's placeholder rather than real names.
  pub fn has_unknown_authors(&self) -> bool { self.authors == UNKNOWN_AUTHOR }

  /// Whether the article has been soft-deleted.
  pub fn is_deleted(&self) -> bool { self.deleted_at.is_some() }
}

impl PartialEq for Article {
  fn eq(&self, other: &Self) -> bool {
    match (&self.external_id, &other.external_id) {
      (Some(ours), Some(theirs)) => ours == theirs,
      _ => self.title == other.title && self.authors == other.authors,
    }
  }
}

impl std::fmt::Display for Article {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{} ({})", self.title, self.authors)?;
    if let Some(year) = self.publication_year {
      write!(f, ", {year}")?;
    }
    Ok(())
  }
}

/// A person derived from the author lists of stored articles.
///
/// `article_count` and `total_citations` are running sums over the non-deleted articles linked to
/// the author. They are maintained incrementally as links are written, never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
  /// Row id
  pub id:              i64,
  /// Exact, whitespace-normalized name; the identity key
  pub full_name:       String,
  /// Number of linked articles
  pub article_count:   i64,
  /// Sum of the citation counts of linked articles
  pub total_citations: i64,
  /// When the author was first derived
  pub first_seen:      DateTime<Utc>,
  /// When the counters last changed
  pub last_updated:    DateTime<Utc>,
  /// When the author was soft-deleted, if it was
  pub deleted_at:      Option<DateTime<Utc>>,
}

impl Author {
  /// Current values of the running counters.
  pub fn counters(&self) -> AuthorCounters {
    AuthorCounters { article_count: self.article_count, total_citations: self.total_citations }
  }
}

/// Running statistics of one author.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorCounters {
  /// Number of linked articles
  pub article_count:   i64,
  /// Sum of the citation counts of linked articles
  pub total_citations: i64,
}

impl AuthorCounters {
  /// Counters after one more article with `citations` citations has been linked.
  pub fn with_article(self, citations: i64) -> Self {
    Self {
      article_count:   self.article_count + 1,
      total_citations: self.total_citations + citations,
    }
  }

  /// Counters after an article with `citations` citations has been unlinked, floored at zero.
  pub fn without_article(self, citations: i64) -> Self {
    Self {
      article_count:   (self.article_count - 1).max(0),
      total_citations: (self.total_citations - citations).max(0),
    }
  }
}

/// Ordered association between an article and one of its authors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleAuthorLink {
  /// Linked article
  pub article_id: i64,
  /// Linked author
  pub author_id:  i64,
  /// Zero-based index of the author in the parsed author list
  pub position:   usize,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::search::{CitedBy, InlineLinks, PublicationInfo, Resource};

  fn harper() -> RawSearchResult {
    RawSearchResult {
      position:         Some(0),
      title:            Some("Population  biology of plants".into()),
      link:             Some("https://www.cabdirect.org/harper".into()),
      snippet:          Some("A classic text.".into()),
      result_id:        Some("QvOS0mbsaN8J".into()),
      publication_info: Some(PublicationInfo {
        summary: Some("JL Harper - Population biology of plants., 1977 - cabdirect.org".into()),
      }),
      inline_links:     Some(InlineLinks {
        cited_by: Some(CitedBy {
          total:    Some(16131),
          cites_id: Some("16055614372148427706".into()),
          link:     None,
        }),
      }),
      resources:        vec![Resource {
        title:       Some("cabdirect.org".into()),
        file_format: Some("PDF".into()),
        link:        Some("https://www.cabdirect.org/harper.pdf".into()),
      }],
    }
  }

  #[test]
  fn test_normalize_complete_result() {
    let article = Article::normalize(&harper());
    assert_eq!(article.id, None);
    assert_eq!(article.title, "Population biology of plants");
    assert_eq!(article.authors, "JL Harper");
    assert_eq!(article.venue, "Population biology of plants.");
    assert_eq!(article.publication_year, Some(1977));
    assert_eq!(article.publisher, "cabdirect.org");
    assert_eq!(article.external_id.as_deref(), Some("QvOS0mbsaN8J"));
    assert_eq!(article.citation_count, 16131);
    assert_eq!(article.citing_set_id.as_deref(), Some("16055614372148427706"));
    assert_eq!(article.pdf_url.as_deref(), Some("https://www.cabdirect.org/harper.pdf"));
    assert_eq!(article.url.as_deref(), Some("https://www.cabdirect.org/harper"));
    assert_eq!(article.abstract_snippet.as_deref(), Some("A classic text."));
    assert!(article.validate().is_ok());
  }

  #[test]
  fn test_normalize_empty_result_uses_defaults() {
    let article = Article::normalize(&RawSearchResult::default());
    assert_eq!(article.title, UNKNOWN_TITLE);
    assert_eq!(article.authors, UNKNOWN_AUTHOR);
    assert_eq!(article.venue, UNKNOWN_SOURCE);
    assert_eq!(article.publisher, UNKNOWN_PUBLISHER);
    assert_eq!(article.publication_year, None);
    assert_eq!(article.citation_count, 0);
    assert_eq!(article.citing_set_id, None);
    assert_eq!(article.external_id, None);
    assert_eq!(article.pdf_url, None);
    assert!(article.has_unknown_authors());
  }

  #[test]
  fn test_normalize_keeps_empty_title_empty() {
    let raw = RawSearchResult { title: Some("   ".into()), ..harper() };
    let article = Article::normalize(&raw);
    assert_eq!(article.title, "");
    assert_eq!(article.validate(), Err(ValidationError::MissingTitle));
  }

  #[test]
  fn test_normalize_drops_malformed_external_id() {
    let raw = RawSearchResult { result_id: Some("abc/def?x=1".into()), ..harper() };
    assert_eq!(Article::normalize(&raw).external_id, None);

    let raw = RawSearchResult { result_id: Some("a-b_C9".into()), ..harper() };
    assert_eq!(Article::normalize(&raw).external_id.as_deref(), Some("a-b_C9"));
  }

  #[test]
  fn test_normalize_drops_future_year() {
    let raw = RawSearchResult {
      publication_info: Some(PublicationInfo {
        summary: Some("J Smith - Journal of Tomorrow, 2030 - future.org".into()),
      }),
      ..harper()
    };
    let article = Article::normalize(&raw);
    if max_publication_year() < 2030 {
      assert_eq!(article.publication_year, None);
    } else {
      assert_eq!(article.publication_year, Some(2030));
    }
    assert!(article.validate().is_ok());
  }

  #[test]
  fn test_normalize_skips_non_pdf_resources() {
    let raw = RawSearchResult {
      resources: vec![Resource {
        title:       None,
        file_format: Some("HTML".into()),
        link:        Some("https://example.org".into()),
      }],
      ..harper()
    };
    assert_eq!(Article::normalize(&raw).pdf_url, None);
  }

  #[test]
  fn test_validate_rejects() {
    let article = Article::new("A title", "  ");
    assert_eq!(article.validate(), Err(ValidationError::MissingAuthors));

    let article = Article::new("A title", "J Smith").with_year(1850);
    assert!(matches!(article.validate(), Err(ValidationError::YearOutOfRange { year: 1850, .. })));

    let article = Article::new("A title", "J Smith").with_citations(-3);
    assert_eq!(article.validate(), Err(ValidationError::NegativeCitations(-3)));

    let article = Article::new("A title", "J Smith").with_external_id("no spaces allowed");
    assert!(matches!(article.validate(), Err(ValidationError::MalformedExternalId(_))));
  }

  #[test]
  fn test_identity() {
    let a = Article::new("Same", "J Smith").with_external_id("id1");
    let b = Article::new("Different", "B Jones").with_external_id("id1");
    let c = Article::new("Same", "J Smith").with_external_id("id2");
    let d = Article::new("Same", "J Smith");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(a, d);
    assert_eq!(d, Article::new("Same", "J Smith").with_citations(10));
  }

  #[test]
  fn test_counters() {
    let counters = AuthorCounters::default().with_article(5).with_article(7);
    assert_eq!(counters, AuthorCounters { article_count: 2, total_citations: 12 });
    assert_eq!(counters.without_article(7), AuthorCounters { article_count: 1, total_citations: 5 });
    assert_eq!(AuthorCounters::default().without_article(3), AuthorCounters::default());
  }
}
