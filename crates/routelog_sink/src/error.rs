//! Error types for sink operations.

use std::io;
use thiserror::Error;

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Errors that can occur while writing or closing a sink.
///
/// Every variant is fatal to the owning channel: a sink that has reported
/// an error can no longer guarantee frame integrity and must not be written
/// again.
#[derive(Debug, Error)]
pub enum SinkError {
    /// An I/O or compressor error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A write consumed fewer bytes than the full buffer.
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite {
        /// Bytes the buffer contained.
        expected: usize,
        /// Bytes the underlying writer accepted.
        written: usize,
    },

    /// The sink was already closed.
    #[error("sink is closed")]
    Closed,
}
