//! Sentinel frame encoding.

use crate::frame::{FrameTag, HEADER_SIZE};

/// Size of a sentinel frame payload: the i32 LE exit code.
pub const SENTINEL_PAYLOAD_SIZE: usize = 4;

/// Total encoded size of a sentinel frame.
pub const SENTINEL_FRAME_SIZE: usize = HEADER_SIZE + SENTINEL_PAYLOAD_SIZE;

/// The closed set of boundary markers written into a channel stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentinelKind {
    /// Start of a route; precedes the first segment-start marker.
    RouteStart,
    /// End of a route; carries the recorded exit code.
    RouteEnd,
    /// Start of a segment; immediately followed by the init payload frame.
    SegmentStart,
    /// End of a non-terminal segment.
    SegmentEnd,
}

impl SentinelKind {
    /// Returns the frame tag this sentinel is written under.
    #[must_use]
    pub const fn tag(self) -> FrameTag {
        match self {
            Self::RouteStart => FrameTag::RouteStart,
            Self::RouteEnd => FrameTag::RouteEnd,
            Self::SegmentStart => FrameTag::SegmentStart,
            Self::SegmentEnd => FrameTag::SegmentEnd,
        }
    }
}

/// Encodes a sentinel frame.
///
/// `exit_code` is meaningful only for [`SentinelKind::RouteEnd`]; callers
/// pass the neutral value 0 for every other kind. The encoding is a fixed
/// [`SENTINEL_FRAME_SIZE`]-byte frame, unambiguous against data frames by
/// tag alone.
#[must_use]
pub fn encode_sentinel(kind: SentinelKind, exit_code: i32) -> Vec<u8> {
    let mut buf = Vec::with_capacity(SENTINEL_FRAME_SIZE);
    buf.push(kind.tag().as_byte());
    buf.extend_from_slice(&(SENTINEL_PAYLOAD_SIZE as u32).to_le_bytes());
    buf.extend_from_slice(&exit_code.to_le_bytes());
    buf
}
