//! # routelog sink
//!
//! Framed file sink for routelog channels.
//!
//! A [`FramedSink`] wraps one output file, optionally through a streaming
//! bzip2 compressor, and exposes an all-or-nothing byte-write operation:
//! every buffer handed to [`FramedSink::write`] is either fully accepted or
//! the sink fails fatally. There is no partial-success return, because a
//! partially written frame would break the self-describing framing that
//! downstream readers rely on.
//!
//! Teardown is [`FramedSink::close`]: the compressed variant finalizes the
//! bzip2 stream so the file is an independently decodable unit, the plain
//! variant flushes, and both sync to disk. Dropping an unclosed sink
//! performs a best-effort close so early-drop and crash paths still leave
//! decodable files behind.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod sink;
mod write;

pub use error::{SinkError, SinkResult};
pub use sink::{FramedSink, COMPRESSED_SUFFIX};
pub use write::{write_once, write_retrying};
