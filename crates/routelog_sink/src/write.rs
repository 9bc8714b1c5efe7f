//! Write disciplines for the two channel kinds.

use crate::error::{SinkError, SinkResult};
use std::io::{ErrorKind, Write};

/// Writes `buf` with a single call to `writer`.
///
/// Used for the uncompressed channel. The buffer must be consumed whole by
/// one write call; a short count means the file now holds a partial frame,
/// which cannot be repaired in place, so it is reported as a fatal
/// [`SinkError::ShortWrite`].
pub fn write_once<W: Write>(writer: &mut W, buf: &[u8]) -> SinkResult<()> {
    let written = writer.write(buf)?;
    if written != buf.len() {
        return Err(SinkError::ShortWrite {
            expected: buf.len(),
            written,
        });
    }
    Ok(())
}

/// Writes `buf` through a compressor in a retry loop.
///
/// Interrupted calls are retried without losing already-buffered state; the
/// compressor keeps whatever it accepted before the signal arrived, so the
/// loop resumes from the advanced counter. Any other error, and a writer
/// that stops accepting bytes entirely, is fatal. Success means the full
/// buffer has been accepted by the compressor's internal buffering;
/// durability to disk is deferred to close.
pub fn write_retrying<W: Write>(writer: &mut W, buf: &[u8]) -> SinkResult<()> {
    let mut written = 0;
    while written < buf.len() {
        match writer.write(&buf[written..]) {
            Ok(0) => {
                return Err(SinkError::ShortWrite {
                    expected: buf.len(),
                    written,
                })
            }
            Ok(n) => written += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(SinkError::Io(e)),
        }
    }
    Ok(())
}
