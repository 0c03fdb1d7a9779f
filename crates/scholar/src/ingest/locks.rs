//! Per-key async locks.

use std::sync::{Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use super::*;

/// Number of tracked keys above which idle entries are pruned.
const PRUNE_THRESHOLD: usize = 1024;

/// A set of async mutexes, one per key, created on first use.
///
/// Holding the guard for a key excludes every other holder of the same key and nobody else.
#[derive(Debug, Default)]
pub struct KeyedLocks {
  locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl KeyedLocks {
  /// Creates an empty lock set.
  pub fn new() -> Self { Self::default() }

  /// Waits until `key` is free and returns a guard that holds it.
  pub async fn lock(&self, key: &str) -> OwnedMutexGuard<()> {
    let lock = {
      let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
      if locks.len() >= PRUNE_THRESHOLD {
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
      }
      Arc::clone(locks.entry(key.to_string()).or_default())
    };
    lock.lock_owned().await
  }

  /// Number of keys currently tracked.
  pub fn len(&self) -> usize { self.locks.lock().unwrap_or_else(PoisonError::into_inner).len() }

  /// Whether no key is tracked.
  pub fn is_empty(&self) -> bool { self.len() == 0 }
}
