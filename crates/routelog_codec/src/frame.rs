//! Frame envelope encoding.

use crate::error::{CodecError, CodecResult};

/// Size of the frame tag field.
pub const TAG_SIZE: usize = 1;

/// Size of the frame length field.
pub const LEN_SIZE: usize = 4;

/// Size of the frame header: tag (1) + length (4).
pub const HEADER_SIZE: usize = TAG_SIZE + LEN_SIZE;

/// Maximum payload size representable in the length field.
pub const MAX_PAYLOAD_LEN: usize = u32::MAX as usize;

/// Tag identifying the kind of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameTag {
    /// Caller-supplied message bytes.
    Data = 0x00,
    /// First frame of a route.
    RouteStart = 0x01,
    /// Final frame of a route, carrying the exit code.
    RouteEnd = 0x02,
    /// First boundary frame of every segment.
    SegmentStart = 0x03,
    /// Final frame of a non-terminal segment.
    SegmentEnd = 0x04,
}

impl FrameTag {
    /// Converts a byte to a frame tag.
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(Self::Data),
            0x01 => Some(Self::RouteStart),
            0x02 => Some(Self::RouteEnd),
            0x03 => Some(Self::SegmentStart),
            0x04 => Some(Self::SegmentEnd),
            _ => None,
        }
    }

    /// Converts the frame tag to a byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Returns true for the four sentinel tags.
    #[must_use]
    pub const fn is_sentinel(self) -> bool {
        !matches!(self, Self::Data)
    }
}

/// Encodes one frame with the given tag around `payload`.
///
/// The returned buffer is the complete frame (header plus payload), built
/// contiguously so a sink can accept it in a single all-or-nothing write.
pub(crate) fn encode_frame(tag: FrameTag, payload: &[u8]) -> CodecResult<Vec<u8>> {
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(CodecError::FrameTooLarge { len: payload.len() });
    }

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.push(tag.as_byte());
    buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(payload);
    Ok(buf)
}

/// Encodes a data frame around caller-supplied message bytes.
///
/// # Errors
///
/// Returns [`CodecError::FrameTooLarge`] if the payload exceeds the
/// 32-bit length field.
pub fn encode_data(payload: &[u8]) -> CodecResult<Vec<u8>> {
    encode_frame(FrameTag::Data, payload)
}
