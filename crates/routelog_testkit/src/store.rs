//! In-memory identifier store fake.

use routelog_core::IdentifierStore;
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A `HashMap`-backed [`IdentifierStore`] with a resolve-call counter.
///
/// The counter lets tests assert the cache's query-at-most-once behavior.
#[derive(Debug, Default)]
pub struct MemoryIdentifierStore {
    values: HashMap<String, String>,
    resolves: AtomicUsize,
}

impl MemoryIdentifierStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from key/value pairs.
    #[must_use]
    pub fn with_values(pairs: &[(&str, &str)]) -> Self {
        Self {
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            resolves: AtomicUsize::new(0),
        }
    }

    /// Returns how many times `resolve` was called.
    #[must_use]
    pub fn resolve_count(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }
}

impl IdentifierStore for MemoryIdentifierStore {
    fn resolve(&self, key: &str) -> io::Result<Option<String>> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        Ok(self.values.get(key).cloned())
    }
}
