//! Storage admission: how many SQLite connections may be in use at once.
//!
//! Two policies implement [`Admission`]:
//!
//! - [`Pooled`] hands out up to `N` connections and keeps released ones for reuse.
//! - [`Serialized`] hands out a single connection at a time. Every acquire opens a fresh
//!   connection and every release tears it down.
//!
//! Callers see both through the same scoped contract: [`Admission::acquire`] returns a
//! [`Handle`], and [`Handle::release`] gives the slot back. Dropping the handle frees the slot
//! too, but a serialized connection then shuts down in the background after the slot is free.
//! Acquiring waits while every slot is taken.

use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Mutex,
};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_rusqlite::Connection;

use super::*;

/// How long a connection waits on a locked database file before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A policy that governs access to storage connections.
#[async_trait]
pub trait Admission: Send + Sync {
  /// Waits for a free slot and returns a connection handle occupying it.
  async fn acquire(&self) -> Result<Handle>;

  /// The policy this admission implements.
  fn policy(&self) -> AdmissionPolicy;

  /// Number of slots that are currently free.
  fn available(&self) -> usize;

  /// Number of physical connections opened so far.
  fn opened(&self) -> usize;
}

/// Idle connections waiting to be reused.
type IdleConnections = Arc<Mutex<Vec<Connection>>>;

/// An admitted connection.
///
/// The slot it occupies is held until the handle is dropped.
pub struct Handle {
  /// The admitted connection
  conn:    Connection,
  /// Where the connection goes back to on release, if it is reused at all
  idle:    Option<IdleConnections>,
  /// Slot held for the lifetime of the handle; must stay the last field
  _permit: OwnedSemaphorePermit,
}

impl Handle {
  /// The underlying async SQLite connection.
  pub fn connection(&self) -> &Connection { &self.conn }

  /// Gives the slot back.
  ///
  /// A pooled connection goes back to the idle list. A serialized connection is closed first, so
  /// the next acquire never overlaps with its teardown.
  pub async fn release(self) -> Result<()> {
    if self.idle.is_none() {
      self.conn.clone().close().await?;
      trace!("Closed serialized connection");
    }
    Ok(())
  }
}

impl Drop for Handle {
  fn drop(&mut self) {
    if let Some(idle) = &self.idle {
      if let Ok(mut idle) = idle.lock() {
        idle.push(self.conn.clone());
      }
    }
  }
}

/// Opens one physical connection with the per-connection settings applied.
async fn connect(path: &Path) -> Result<Connection> {
  let conn = Connection::open(path).await?;
  conn
    .call(|conn| {
      conn.busy_timeout(BUSY_TIMEOUT)?;
      conn.execute_batch("PRAGMA foreign_keys = ON;")?;
      Ok(())
    })
    .await?;
  trace!(path = %path.display(), "Opened storage connection");
  Ok(conn)
}

/// Bounded pool of reusable connections.
pub struct Pooled {
  /// Database file the connections point at
  path:    PathBuf,
  /// One permit per pool slot
  permits: Arc<Semaphore>,
  /// Released connections ready for reuse
  idle:    IdleConnections,
  /// Maximum number of concurrent handles
  size:    usize,
  /// Physical connections opened so far
  opened:  AtomicUsize,
}

impl Pooled {
  /// Creates a pool of at most `size` connections to the database at `path`.
  ///
  /// Connections are opened lazily, the first time a slot is used.
  pub fn new(path: impl AsRef<Path>, size: usize) -> Result<Self> {
    if size == 0 {
      return Err(ScholarError::InvalidInput("pool size must be at least 1".into()));
    }
    Ok(Self {
      path: path.as_ref().to_path_buf(),
      permits: Arc::new(Semaphore::new(size)),
      idle: Arc::new(Mutex::new(Vec::with_capacity(size))),
      size,
      opened: AtomicUsize::new(0),
    })
  }

  /// Maximum number of concurrent handles.
  pub fn size(&self) -> usize { self.size }
}

#[async_trait]
impl Admission for Pooled {
  async fn acquire(&self) -> Result<Handle> {
    let permit =
      self.permits.clone().acquire_owned().await.map_err(|_| ScholarError::AdmissionClosed)?;

    let reused = self.idle.lock().ok().and_then(|mut idle| idle.pop());
    let conn = match reused {
      Some(conn) => conn,
      None => {
        let conn = connect(&self.path).await?;
        self.opened.fetch_add(1, Ordering::SeqCst);
        conn
      },
    };

    trace!(available = self.permits.available_permits(), "Acquired pooled connection");
    Ok(Handle { conn, idle: Some(Arc::clone(&self.idle)), _permit: permit })
  }

  fn policy(&self) -> AdmissionPolicy { AdmissionPolicy::Pooled }

  fn available(&self) -> usize { self.permits.available_permits() }

  fn opened(&self) -> usize { self.opened.load(Ordering::SeqCst) }
}

impl std::fmt::Debug for Pooled {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pooled")
      .field("path", &self.path)
      .field("size", &self.size)
      .field("available", &self.available())
      .finish()
  }
}

/// A single short-lived connection at a time.
pub struct Serialized {
  /// Database file the connection points at
  path:   PathBuf,
  /// The only permit
  permit: Arc<Semaphore>,
  /// Physical connections opened so far
  opened: AtomicUsize,
}

impl Serialized {
  /// Creates a serialized admission for the database at `path`.
  pub fn new(path: impl AsRef<Path>) -> Self {
    Self {
      path:   path.as_ref().to_path_buf(),
      permit: Arc::new(Semaphore::new(1)),
      opened: AtomicUsize::new(0),
    }
  }
}

#[async_trait]
impl Admission for Serialized {
  async fn acquire(&self) -> Result<Handle> {
    let permit =
      self.permit.clone().acquire_owned().await.map_err(|_| ScholarError::AdmissionClosed)?;
    let conn = connect(&self.path).await?;
    self.opened.fetch_add(1, Ordering::SeqCst);
    trace!("Acquired serialized connection");
    Ok(Handle { conn, idle: None, _permit: permit })
  }

  fn policy(&self) -> AdmissionPolicy { AdmissionPolicy::Serialized }

  fn available(&self) -> usize { self.permit.available_permits() }

  fn opened(&self) -> usize { self.opened.load(Ordering::SeqCst) }
}

impl std::fmt::Debug for Serialized {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Serialized")
      .field("path", &self.path)
      .field("available", &self.available())
      .finish()
  }
}

/// Builds the admission selected by `config` for the database at `path`.
pub fn from_config(path: impl AsRef<Path>, config: &AdmissionConfig) -> Result<Arc<dyn Admission>> {
  Ok(match config.policy {
    AdmissionPolicy::Pooled => Arc::new(Pooled::new(path, config.pool_size)?),
    AdmissionPolicy::Serialized => Arc::new(Serialized::new(path)),
  })
}
