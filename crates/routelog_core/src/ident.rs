//! Identifier resolution and caching.
//!
//! Route names and initialization payloads need small metadata strings
//! (hardware serial, build version, and the like) that live in an external
//! persisted key/value store. Those identifiers do not change while the
//! process runs, so results are cached for the process lifetime, including
//! an explicit absent marker to avoid repeated misses.

use crate::error::CoreResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;

/// Boundary to the external persisted key/value store.
///
/// Implementations look a key up in whatever storage backs the deployment.
/// Returning `Ok(None)` means the key is genuinely absent; errors are
/// reserved for the store itself being unreachable or corrupt.
pub trait IdentifierStore: Send + Sync {
    /// Resolves `key` to its stored value, or `None` if absent.
    fn resolve(&self, key: &str) -> io::Result<Option<String>>;
}

/// Process-lifetime cache over an [`IdentifierStore`].
///
/// Entries are immutable once populated and never invalidated; absent keys
/// are cached as `None` so the store is queried at most once per key.
pub struct IdentifierCache {
    store: Arc<dyn IdentifierStore>,
    entries: Mutex<HashMap<String, Option<String>>>,
}

impl IdentifierCache {
    /// Creates an empty cache over `store`.
    pub fn new(store: Arc<dyn IdentifierStore>) -> Self {
        Self {
            store,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the value for `key`, consulting the store on first use.
    ///
    /// # Errors
    ///
    /// Propagates store errors; a failed lookup is not cached.
    pub fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let mut entries = self.entries.lock();
        if let Some(cached) = entries.get(key) {
            return Ok(cached.clone());
        }

        let resolved = self.store.resolve(key)?;
        entries.insert(key.to_string(), resolved.clone());
        Ok(resolved)
    }
}

impl std::fmt::Debug for IdentifierCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifierCache")
            .field("entries", &self.entries.lock().len())
            .finish_non_exhaustive()
    }
}
