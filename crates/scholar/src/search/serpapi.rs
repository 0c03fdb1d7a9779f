//! SerpApi Google Scholar client.
//!
//! Requests go to `search.json?engine=google_scholar` with the API key as a query parameter.
//! The key is masked before any URL is logged.

use url::Url;

use super::*;

/// Default endpoint of the SerpApi search API.
pub const DEFAULT_BASE_URL: &str = "https://serpapi.com/search.json";

/// Engine parameter selecting Google Scholar.
const ENGINE: &str = "google_scholar";

/// Longest body excerpt kept in a transport error.
const MAX_ERROR_BODY: usize = 512;

lazy_static! {
  static ref API_KEY_PARAM: Regex = Regex::new(r"api_key=[^&]*").unwrap();
}

/// HTTP client for the SerpApi Google Scholar engine.
#[derive(Debug, Clone)]
pub struct SerpApiClient {
  /// Shared HTTP connection pool
  http:     reqwest::Client,
  /// Endpoint all requests are sent to
  base_url: String,
  /// SerpApi private key
  api_key:  String,
}

impl SerpApiClient {
  /// Creates a client against the public SerpApi endpoint.
  pub fn new(api_key: impl Into<String>) -> Self {
    Self { http: reqwest::Client::new(), base_url: DEFAULT_BASE_URL.to_string(), api_key: api_key.into() }
  }

  /// Points the client at a different endpoint, e.g. a local stub.
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.base_url = base_url.into();
    self
  }

  /// Builds a client from the `[search]` section of a [`Config`].
  pub fn from_config(config: &SearchConfig) -> Result<Self> {
    let api_key = config.resolve_api_key().ok_or_else(|| {
      ScholarError::Config(format!(
        "No search API key configured. Set `api_key` under [search] or export {API_KEY_ENV}."
      ))
    })?;
    Ok(Self::new(api_key).with_base_url(config.base_url.clone()))
  }

  /// Builds the request URL for a set of search parameters.
  pub(crate) fn build_url(&self, params: &[(&str, String)], max: usize) -> Result<Url> {
    let num = max.clamp(1, MAX_RESULTS_PER_REQUEST).to_string();
    let mut pairs = vec![("engine", ENGINE.to_string())];
    pairs.extend(params.iter().cloned());
    pairs.push(("num", num));
    pairs.push(("api_key", self.api_key.clone()));

    Url::parse_with_params(&self.base_url, &pairs)
      .map_err(|e| ScholarError::Config(format!("Invalid search base URL {}: {e}", self.base_url)))
  }

  async fn execute(&self, url: Url) -> Result<SearchResponse> {
    debug!(url = %mask_api_key(url.as_str()), "Sending search request");

    let response = self.http.get(url.clone()).header("Accept", "application/json").send().await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
      warn!(status = status.as_u16(), url = %mask_api_key(url.as_str()), "Search request failed");
      return Err(ScholarError::Transport {
        status: status.as_u16(),
        body:   body.chars().take(MAX_ERROR_BODY).collect(),
      });
    }

    let parsed: SearchResponse = serde_json::from_str(&body)?;
    debug!(results = parsed.organic_results.len(), "Search request succeeded");
    Ok(parsed)
  }
}

#[async_trait]
impl ScholarSearch for SerpApiClient {
  async fn search_articles(&self, query: &str, max: usize) -> Result<SearchResponse> {
    let query = non_empty(query, "search query")?;
    info!(%query, "Searching articles");
    let url = self.build_url(&[("q", query.to_string())], max)?;
    self.execute(url).await
  }

  async fn search_by_author(&self, name: &str, max: usize) -> Result<SearchResponse> {
    let name = non_empty(name, "author name")?;
    info!(author = %name, "Searching articles by author");
    let url = self.build_url(&[("q", format!("author:\"{name}\""))], max)?;
    self.execute(url).await
  }

  async fn search_citing(&self, citing_set_id: &str, max: usize) -> Result<SearchResponse> {
    let citing_set_id = non_empty(citing_set_id, "citing set id")?;
    info!(%citing_set_id, "Searching citing articles");
    let url = self.build_url(&[("cites", citing_set_id.to_string())], max)?;
    self.execute(url).await
  }
}

/// Replaces the value of the `api_key` query parameter with `***`.
pub fn mask_api_key(url: &str) -> String { API_KEY_PARAM.replace_all(url, "api_key=***").into_owned() }

fn non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    Err(ScholarError::InvalidInput(format!("{what} cannot be empty")))
  } else {
    Ok(trimmed)
  }
}
