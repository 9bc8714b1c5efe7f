//! Route fixtures.

use crate::reader::{read_channel, Frame};
use crate::store::MemoryIdentifierStore;
use routelog_core::{Config, IdentifierCache, IdentifierStore, RouteLogger};
use routelog_sink::COMPRESSED_SUFFIX;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A temp-directory log root with automatic cleanup.
pub struct TestRoute {
    root: TempDir,
}

impl TestRoute {
    /// Creates a fresh temp log root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("failed to create temp log root"),
        }
    }

    /// Returns the log root path.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Returns a default configuration rooted at the temp dir.
    #[must_use]
    pub fn config(&self) -> Config {
        Config::new(self.root.path())
    }

    /// Creates a logger with default config, token-only naming, and an
    /// empty identifier store.
    #[must_use]
    pub fn logger(&self, init_payload: &[u8]) -> RouteLogger {
        self.logger_with(self.config(), init_payload)
    }

    /// Creates a logger with the given configuration.
    #[must_use]
    pub fn logger_with(&self, config: Config, init_payload: &[u8]) -> RouteLogger {
        let store: Arc<dyn IdentifierStore> = Arc::new(MemoryIdentifierStore::new());
        let cache = IdentifierCache::new(store);
        RouteLogger::create(config, &cache, init_payload.to_vec())
            .expect("failed to create route logger")
    }
}

impl Default for TestRoute {
    fn default() -> Self {
        Self::new()
    }
}

/// Path of a segment's full-log channel under default naming.
#[must_use]
pub fn full_log_path(segment_path: &Path) -> PathBuf {
    segment_path.join(format!("rlog{COMPRESSED_SUFFIX}"))
}

/// Path of a segment's quick-log channel under default naming.
#[must_use]
pub fn quick_log_path(segment_path: &Path) -> PathBuf {
    segment_path.join("qlog")
}

/// Reads a segment's full-log frames under default naming.
#[must_use]
pub fn full_log_frames(segment_path: &Path) -> Vec<Frame> {
    read_channel(full_log_path(segment_path)).expect("failed to read full log")
}

/// Reads a segment's quick-log frames under default naming.
#[must_use]
pub fn quick_log_frames(segment_path: &Path) -> Vec<Frame> {
    read_channel(quick_log_path(segment_path)).expect("failed to read quick log")
}
