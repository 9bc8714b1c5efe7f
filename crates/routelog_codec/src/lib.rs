//! # routelog codec
//!
//! Frame envelope and sentinel codec for routelog channels.
//!
//! Every routelog channel (full log and quick log) is a linear sequence of
//! frames. Most frames carry opaque caller-supplied message bytes; a small
//! closed set of sentinel frames marks route and segment boundaries so a
//! single pass over a channel recovers its structure, including the point
//! of truncation after a crash.
//!
//! This crate owns the envelope and the sentinel encoding only. It performs
//! no I/O and does not decode streams; readers live outside the logger core.
//!
//! ## Frame format
//!
//! ```text
//! [tag: u8][len: u32 LE][payload: len bytes]
//! ```
//!
//! Tag `0x00` is a data frame whose payload is the caller's bytes. Tags
//! `0x01`..`0x04` are sentinel frames whose payload is a fixed 4-byte
//! little-endian exit code (meaningful for route-end, zero otherwise).

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod frame;
mod sentinel;

pub use error::{CodecError, CodecResult};
pub use frame::{encode_data, FrameTag, HEADER_SIZE, LEN_SIZE, MAX_PAYLOAD_LEN, TAG_SIZE};
pub use sentinel::{encode_sentinel, SentinelKind, SENTINEL_FRAME_SIZE, SENTINEL_PAYLOAD_SIZE};
