//! Process-wide store handle with lazy, retryable initialization.
//!
//! Handlers run as independent stateless invocations but share one database
//! handle per process. [`SharedStore`] opens the store on first use and
//! reuses it afterwards; a failed open is *not* memoized, so the next caller
//! gets a fresh attempt instead of a cached error.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::{Result, StoreError};
use crate::rocks::RocksStore;

/// Lazily-initialized, process-scoped holder for the [`RocksStore`].
#[derive(Clone)]
pub struct SharedStore {
    path: PathBuf,
    inner: Arc<Mutex<Option<Arc<RocksStore>>>>,
}

impl SharedStore {
    /// Create a holder for a database at `path`. Does not open anything yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the store, opening it on first use.
    ///
    /// Concurrent first calls race on the mutex, not on the database: only
    /// one open happens and every caller gets the same handle. On failure the
    /// slot stays empty and the next call retries.
    ///
    /// # Errors
    ///
    /// Returns the open error for this attempt.
    pub fn get_or_open(&self) -> Result<Arc<RocksStore>> {
        let mut slot = self
            .inner
            .lock()
            .map_err(|_| StoreError::Database("shared store lock poisoned".into()))?;

        if let Some(store) = slot.as_ref() {
            return Ok(Arc::clone(store));
        }

        tracing::info!(path = %self.path.display(), "Opening RocksDB store");
        let store = Arc::new(RocksStore::open(&self.path)?);
        *slot = Some(Arc::clone(&store));
        Ok(store)
    }

    /// Whether the store has been opened successfully.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.lock().is_ok_and(|slot| slot.is_some())
    }
}
