//! Error types for routelog core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in routelog core operations.
///
/// None of these are recoverable in place: once an operation on a
/// [`crate::RouteLogger`] fails, the instance is unusable and the route's
/// lock file remains behind as the durable failure signal.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Channel sink error.
    #[error("sink error: {0}")]
    Sink(#[from] routelog_sink::SinkError),

    /// Frame encoding error.
    #[error("codec error: {0}")]
    Codec(#[from] routelog_codec::CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An identifier needed to name or initialize the route is absent
    /// from the persisted store.
    #[error("missing identifier: {key}")]
    MissingIdentifier {
        /// The key that could not be resolved.
        key: String,
    },

    /// Another writer holds the route's lock file.
    #[error("route locked: another writer has exclusive access")]
    RouteLocked,

    /// The logger was closed or invalidated by an earlier failure.
    #[error("route is closed")]
    RouteClosed,

    /// Empty message buffers are not valid frames.
    #[error("empty message")]
    EmptyMessage,
}

impl CoreError {
    /// Creates a missing identifier error.
    pub fn missing_identifier(key: impl Into<String>) -> Self {
        Self::MissingIdentifier { key: key.into() }
    }
}
