//! Error types for frame encoding.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while encoding frames.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Payload does not fit in the 32-bit length field.
    #[error("frame payload too large: {len} bytes exceeds the u32 length field")]
    FrameTooLarge {
        /// Size of the rejected payload.
        len: usize,
    },
}
