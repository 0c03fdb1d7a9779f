//! The external scholarly search collaborator.
//!
//! The ingestion core only needs an ordered list of raw results per query. This module
//! defines:
//!
//! - [`ScholarSearch`]: the trait any search backend implements
//! - [`SearchResponse`] and [`RawSearchResult`]: the raw, already-deserialized response shape,
//!   which mirrors the SerpApi Google Scholar JSON
//! - [`serpapi::SerpApiClient`]: the HTTP implementation
//!
//! Every field of a raw result is optional. Turning it into something storable is the job of
//! [`Article::normalize`](crate::article::Article::normalize).

use super::*;

pub mod serpapi;

pub use self::serpapi::SerpApiClient;

/// Largest page the upstream service will return for one request.
pub const MAX_RESULTS_PER_REQUEST: usize = 20;

/// A source of scholarly search results.
///
/// Implementations report transport failures (unreachable service, non-success status,
/// undecodable body) as errors. The batch orchestrator treats any such error as "no results
/// for this query".
#[async_trait]
pub trait ScholarSearch: Send + Sync {
  /// Free-text search over works.
  async fn search_articles(&self, query: &str, max: usize) -> Result<SearchResponse>;

  /// Search for works written by a named researcher.
  async fn search_by_author(&self, name: &str, max: usize) -> Result<SearchResponse>;

  /// Search for works citing the work behind `citing_set_id`.
  async fn search_citing(&self, citing_set_id: &str, max: usize) -> Result<SearchResponse>;
}

/// One response page from the search service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
  /// Bookkeeping reported by the service
  #[serde(default)]
  pub search_metadata: Option<SearchMetadata>,
  /// Ranked work results
  #[serde(default)]
  pub organic_results: Vec<RawSearchResult>,
  /// Candidate researcher profiles, most relevant first
  // SerpApi uses `profiles` for an unrelated object, so this needs its own key.
  #[serde(default, rename = "author_profiles", skip_serializing_if = "Vec::is_empty")]
  pub profiles:        Vec<AuthorProfile>,
}

/// Service-side bookkeeping about a search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchMetadata {
  /// Upstream search id
  pub id:     Option<String>,
  /// Upstream status, `"Success"` when the search completed
  pub status: Option<String>,
}

/// A researcher profile with the works attributed to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorProfile {
  /// Display name of the researcher
  pub name:         String,
  /// Upstream profile identifier
  #[serde(default)]
  pub author_id:    Option<String>,
  /// Affiliation line shown on the profile
  #[serde(default)]
  pub affiliations: Option<String>,
  /// Works attributed to the profile, in upstream order
  #[serde(default)]
  pub publications: Vec<RawSearchResult>,
}

/// One raw work result, exactly as the service described it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSearchResult {
  /// Rank of the result within the page
  #[serde(default)]
  pub position:         Option<u32>,
  /// Title of the work
  #[serde(default)]
  pub title:            Option<String>,
  /// Landing page of the work
  #[serde(default)]
  pub link:             Option<String>,
  /// Short excerpt of the work's text
  #[serde(default)]
  pub snippet:          Option<String>,
  /// Opaque upstream identifier of the result
  #[serde(default)]
  pub result_id:        Option<String>,
  /// Composite authors/venue/publisher description
  #[serde(default)]
  pub publication_info: Option<PublicationInfo>,
  /// Inline links, including the citation counter
  #[serde(default)]
  pub inline_links:     Option<InlineLinks>,
  /// Full-text resources such as PDFs
  #[serde(default)]
  pub resources:        Vec<Resource>,
}

/// The `publication_info` block of a raw result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublicationInfo {
  /// `"authors - venue, year - publisher"` line
  #[serde(default)]
  pub summary: Option<String>,
}

/// The `inline_links` block of a raw result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InlineLinks {
  /// Citation counter, absent for uncited works
  #[serde(default)]
  pub cited_by: Option<CitedBy>,
}

/// Inline citation information of a raw result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitedBy {
  /// Number of citing works
  #[serde(default)]
  pub total:    Option<i64>,
  /// Identifier of the set of citing works
  #[serde(default)]
  pub cites_id: Option<String>,
  /// Link listing the citing works
  #[serde(default)]
  pub link:     Option<String>,
}

/// A full-text resource attached to a raw result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
  /// Host of the resource
  #[serde(default)]
  pub title:       Option<String>,
  /// Format label such as `"PDF"` or `"HTML"`
  #[serde(default)]
  pub file_format: Option<String>,
  /// Location of the resource
  #[serde(default)]
  pub link:        Option<String>,
}

impl SearchResponse {
  /// Works of the first matching researcher.
  ///
  /// When the service returned researcher profiles, only the first profile's publications are
  /// used and the remaining profiles are ignored. Without profiles, the organic results stand
  /// in as one implicit match. Returns `None` when there is nothing at all.
  pub fn first_match(&self) -> Option<&[RawSearchResult]> {
    if let Some(profile) = self.profiles.first() {
      if self.profiles.len() > 1 {
        debug!(
          chosen = %profile.name,
          ignored = self.profiles.len() - 1,
          "Several researcher profiles matched, using the first"
        );
      }
      return Some(&profile.publications);
    }

    if self.organic_results.is_empty() {
      None
    } else {
      Some(&self.organic_results)
    }
  }

  /// Whether the service reported a completed search.
  pub fn is_success(&self) -> bool {
    self.search_metadata.as_ref().and_then(|meta| meta.status.as_deref()) == Some("Success")
  }
}

impl RawSearchResult {
  /// The summary line, if the result carries one.
  pub fn summary(&self) -> Option<&str> {
    self.publication_info.as_ref().and_then(|info| info.summary.as_deref())
  }

  /// The inline citation block, if the result carries one.
  pub fn cited_by(&self) -> Option<&CitedBy> {
    self.inline_links.as_ref().and_then(|links| links.cited_by.as_ref())
  }

  /// Link of the first resource whose format is PDF, ignoring case.
  pub fn pdf_link(&self) -> Option<&str> {
    self
      .resources
      .iter()
      .find(|resource| {
        resource.file_format.as_deref().is_some_and(|format| format.eq_ignore_ascii_case("PDF"))
      })
      .and_then(|resource| resource.link.as_deref())
  }
}
