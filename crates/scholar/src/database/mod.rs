//! SQLite storage for articles, authors and their links.
//!
//! A [`Database`] owns the configured [`Admission`] policy and nothing else: every operation
//! first acquires a [`Handle`] and then runs on that handle's connection. The storage primitives
//! used by ingestion live on [`Handle`] (see the `store` module), while read-side and maintenance
//! operations are [`DatabaseInstruction`]s executed against the database.
//!
//! The schema is applied on open and is idempotent.
//!
//! ```no_run
//! use scholar::{
//!   config::{AdmissionConfig, AdmissionPolicy},
//!   database::{Database, Stats},
//!   prelude::*,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AdmissionConfig { policy: AdmissionPolicy::Serialized, pool_size: 1 };
//! let db = Database::open_with("scholar.db", &config).await?;
//! let stats = Stats.execute(&db).await?;
//! println!("{} articles", stats.articles);
//! # Ok(())
//! # }
//! ```

use super::*;

pub mod admission;
pub mod instruction;
mod store;
#[cfg(test)] mod tests;

pub use self::{
  admission::{Admission, Handle, Pooled, Serialized},
  instruction::*,
};
pub(crate) use self::store::{article_from_row, author_from_row, ARTICLE_COLUMNS, AUTHOR_COLUMNS};

/// Schema applied to every database on open.
const SCHEMA: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/migrations/init.sql"));

/// Handle to the article store.
///
/// Cloning is cheap and clones share the same admission policy.
#[derive(Clone)]
pub struct Database {
  /// Location of the database file
  path:      PathBuf,
  /// Policy that hands out connections
  admission: Arc<dyn Admission>,
}

impl Database {
  /// Opens (creating if needed) the database at `path` with the default pooled admission.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with(path, &AdmissionConfig::default()).await
  }

  /// Opens (creating if needed) the database at `path` with the given admission policy.
  ///
  /// Parent directories are created, and the schema is applied through the first admitted
  /// connection.
  pub async fn open_with(path: impl AsRef<Path>, config: &AdmissionConfig) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent).await?;
    }

    let admission = admission::from_config(&path, config)?;
    let db = Self { path, admission };
    db.migrate().await?;

    info!(path = %db.path.display(), policy = ?config.policy, "Opened database");
    Ok(db)
  }

  /// Opens the database described by a [`Config`].
  pub async fn from_config(config: &Config) -> Result<Self> {
    Self::open_with(&config.database_path, &config.admission).await
  }

  /// Waits for the admission policy to hand out a connection.
  pub async fn acquire(&self) -> Result<Handle> { self.admission.acquire().await }

  /// The admission policy in use.
  pub fn admission(&self) -> &dyn Admission { self.admission.as_ref() }

  /// Location of the database file.
  pub fn path(&self) -> &Path { &self.path }

  /// Returns the default path for the database file.
  ///
  /// The path is constructed as follows:
  /// - On Unix: `~/.local/share/scholar/scholar.db`
  /// - On macOS: `~/Library/Application Support/scholar/scholar.db`
  /// - On Windows: `%APPDATA%\scholar\scholar.db`
  /// - Fallback: `./scholar/scholar.db` relative to the current directory
  pub fn default_path() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("scholar").join("scholar.db")
  }

  async fn migrate(&self) -> Result<()> {
    let handle = self.acquire().await?;
    handle
      .connection()
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    handle.release().await
  }
}

impl std::fmt::Debug for Database {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Database")
      .field("path", &self.path)
      .field("policy", &self.admission.policy())
      .finish()
  }
}
