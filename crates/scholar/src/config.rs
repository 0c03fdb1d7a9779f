//! TOML configuration for the scholar library and CLI.
//!
//! ```toml
//! database_path = "/home/me/.local/share/scholar/scholar.db"
//!
//! [admission]
//! policy = "pooled"
//! pool_size = 10
//!
//! [search]
//! api_key = "..."
//! base_url = "https://serpapi.com/search.json"
//! max_results = 20
//!
//! [ingest]
//! per_query_cap = 10
//! ```
//!
//! Every section and key is optional and falls back to the defaults shown above.

use super::*;

/// Environment variable that overrides the configured search API key.
pub const API_KEY_ENV: &str = "SERP_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Location of the SQLite database file
  pub database_path: PathBuf,
  /// Storage admission policy
  pub admission:     AdmissionConfig,
  /// Search service settings
  pub search:        SearchConfig,
  /// Ingestion settings
  pub ingest:        IngestConfig,
}

/// How concurrent storage access is governed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdmissionPolicy {
  /// Up to `pool_size` reusable connections
  #[default]
  Pooled,
  /// One short-lived connection at a time, reopened on every acquire
  Serialized,
}

/// The `[admission]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdmissionConfig {
  /// Which policy to apply
  pub policy:    AdmissionPolicy,
  /// Number of concurrent handles under [`AdmissionPolicy::Pooled`]
  pub pool_size: usize,
}

/// The `[search]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
  /// SerpApi key; [`API_KEY_ENV`] takes precedence when set
  #[serde(skip_serializing_if = "Option::is_none")]
  pub api_key:     Option<String>,
  /// Search endpoint
  pub base_url:    String,
  /// Results requested per search, at most 20
  pub max_results: usize,
}

/// The `[ingest]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
  /// Default number of results ingested per query
  pub per_query_cap: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_path: Database::default_path(),
      admission:     AdmissionConfig::default(),
      search:        SearchConfig::default(),
      ingest:        IngestConfig::default(),
    }
  }
}

impl Default for AdmissionConfig {
  fn default() -> Self { Self { policy: AdmissionPolicy::Pooled, pool_size: 10 } }
}

impl Default for SearchConfig {
  fn default() -> Self {
    Self {
      api_key:     None,
      base_url:    serpapi::DEFAULT_BASE_URL.to_string(),
      max_results: MAX_RESULTS_PER_REQUEST,
    }
  }
}

impl Default for IngestConfig {
  fn default() -> Self { Self { per_query_cap: 10 } }
}

impl Config {
  /// Default location of the configuration file, `<config dir>/scholar/config.toml`.
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("scholar").join("config.toml")
  }

  /// Reads and validates a configuration file.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading configuration");
    let content = std::fs::read_to_string(path)?;
    let config: Self = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
  }

  /// Writes the configuration, creating parent directories as needed.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(self)?)?;
    info!(path = %path.display(), "Saved configuration");
    Ok(())
  }

  /// Rejects values that parse but cannot be used.
  pub fn validate(&self) -> Result<()> {
    if self.admission.pool_size == 0 {
      return Err(ScholarError::Config("admission.pool_size must be at least 1".into()));
    }
    if self.search.max_results == 0 || self.search.max_results > MAX_RESULTS_PER_REQUEST {
      return Err(ScholarError::Config(format!(
        "search.max_results must be between 1 and {MAX_RESULTS_PER_REQUEST}"
      )));
    }
    if self.ingest.per_query_cap == 0 {
      return Err(ScholarError::Config("ingest.per_query_cap must be at least 1".into()));
    }
    Ok(())
  }

  /// Sets the database location.
  pub fn with_database_path(mut self, path: impl AsRef<Path>) -> Self {
    self.database_path = path.as_ref().to_path_buf();
    self
  }

  /// Sets the admission policy and pool size.
  pub fn with_admission(mut self, policy: AdmissionPolicy, pool_size: usize) -> Self {
    self.admission = AdmissionConfig { policy, pool_size };
    self
  }

  /// Sets the search API key.
  pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
    self.search.api_key = Some(api_key.into());
    self
  }

  /// Sets the search endpoint.
  pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
    self.search.base_url = base_url.into();
    self
  }

  /// Sets the default per-query ingestion cap.
  pub fn with_per_query_cap(mut self, per_query_cap: usize) -> Self {
    self.ingest.per_query_cap = per_query_cap;
    self
  }

  /// The API key to use: the environment override first, then the configured value.
  pub fn resolve_api_key(&self) -> Option<String> { self.search.resolve_api_key() }
}

impl SearchConfig {
  /// The API key to use: the environment override first, then the configured value.
  pub fn resolve_api_key(&self) -> Option<String> {
    std::env::var(API_KEY_ENV)
      .ok()
      .filter(|key| !key.trim().is_empty())
      .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
  }
}
