//! Logger configuration.
//!
//! Route naming and on-disk layout are policy, not core semantics, so they
//! live here: which identifier keys feed the route name, how segment
//! indices are formatted, and what the two channel files are called.

use std::path::{Path, PathBuf};

/// Default zero-pad width for segment directory names.
const DEFAULT_INDEX_WIDTH: usize = 4;

/// Default file name of the full-log channel (compressed suffix is applied
/// by the sink).
const DEFAULT_FULL_LOG_NAME: &str = "rlog";

/// Default file name of the quick-log channel.
const DEFAULT_QUICK_LOG_NAME: &str = "qlog";

/// Configuration for creating a [`crate::RouteLogger`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory under which route directories and lock files are created.
    pub log_root: PathBuf,

    /// Identifier keys resolved through the [`crate::IdentifierCache`] and
    /// joined into the route name. A missing key is fatal at creation.
    pub identifier_keys: Vec<String>,

    /// Fixed route name overriding the derived identifier/token scheme.
    ///
    /// Intended for callers that own their own naming policy. With a fixed
    /// name, collision protection falls entirely on the route lock file.
    pub route_name: Option<String>,

    /// Zero-pad width for segment directory names; 0 uses the plain
    /// decimal index. The default width keeps lexical order equal to
    /// numeric order.
    pub segment_index_width: usize,

    /// Base file name of the full-log channel.
    pub full_log_name: String,

    /// Base file name of the quick-log channel.
    pub quick_log_name: String,
}

impl Config {
    /// Creates a configuration rooted at `log_root` with default policy.
    pub fn new(log_root: impl Into<PathBuf>) -> Self {
        Self {
            log_root: log_root.into(),
            identifier_keys: Vec::new(),
            route_name: None,
            segment_index_width: DEFAULT_INDEX_WIDTH,
            full_log_name: DEFAULT_FULL_LOG_NAME.to_string(),
            quick_log_name: DEFAULT_QUICK_LOG_NAME.to_string(),
        }
    }

    /// Sets the identifier keys joined into the route name.
    #[must_use]
    pub fn identifier_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifier_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Fixes the route name instead of deriving it.
    #[must_use]
    pub fn route_name(mut self, name: impl Into<String>) -> Self {
        self.route_name = Some(name.into());
        self
    }

    /// Sets the segment index zero-pad width (0 = plain decimal).
    #[must_use]
    pub const fn segment_index_width(mut self, width: usize) -> Self {
        self.segment_index_width = width;
        self
    }

    /// Sets the channel base file names.
    #[must_use]
    pub fn channel_names(mut self, full: impl Into<String>, quick: impl Into<String>) -> Self {
        self.full_log_name = full.into();
        self.quick_log_name = quick.into();
        self
    }

    /// Returns the log root.
    #[must_use]
    pub fn log_root(&self) -> &Path {
        &self.log_root
    }

    /// Formats a segment index as a directory name.
    #[must_use]
    pub fn format_index(&self, index: u64) -> String {
        if self.segment_index_width == 0 {
            index.to_string()
        } else {
            format!("{index:0width$}", width = self.segment_index_width)
        }
    }
}
