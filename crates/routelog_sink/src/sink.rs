//! Framed sink over a file, optionally compressed.

use crate::error::{SinkError, SinkResult};
use crate::write::{write_once, write_retrying};
use bzip2::write::BzEncoder;
use bzip2::Compression;
use std::fs::File;
use std::io::Write;
use std::mem;
use std::path::{Path, PathBuf};

/// Suffix appended to the file name of a compressed sink.
pub const COMPRESSED_SUFFIX: &str = ".bz2";

enum Inner {
    Plain(File),
    Compressed(BzEncoder<File>),
    Closed,
}

/// One output file of a segment channel.
///
/// Opens in truncate mode, accepts whole buffers through [`write`], and is
/// torn down with [`close`]. The compressed variant streams through bzip2 at
/// maximum compression level; its on-disk name carries the
/// [`COMPRESSED_SUFFIX`].
///
/// # Failure semantics
///
/// Every error is fatal to the sink. A buffer is either fully accepted or
/// the sink is dead; there is no partial-success return. Close errors are
/// fatal too, because an unfinalized or unsynced file cannot be trusted.
///
/// [`write`]: FramedSink::write
/// [`close`]: FramedSink::close
pub struct FramedSink {
    path: PathBuf,
    inner: Inner,
}

impl FramedSink {
    /// Creates or truncates the sink file at `path`.
    ///
    /// When `compressed` is true the actual file name is
    /// `<path>.bz2` and writes stream through a bzip2 encoder at maximum
    /// compression level with the default work factor.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn open(path: &Path, compressed: bool) -> SinkResult<Self> {
        let path = if compressed {
            let mut name = path.as_os_str().to_os_string();
            name.push(COMPRESSED_SUFFIX);
            PathBuf::from(name)
        } else {
            path.to_path_buf()
        };

        let file = File::create(&path)?;
        let inner = if compressed {
            Inner::Compressed(BzEncoder::new(file, Compression::best()))
        } else {
            Inner::Plain(file)
        };

        Ok(Self { path, inner })
    }

    /// Returns the on-disk path of the sink, including the compressed
    /// suffix when one applies.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the entire buffer to the sink.
    ///
    /// The uncompressed path issues one write call and treats a short count
    /// as fatal. The compressed path retries interrupted calls until the
    /// compressor has accepted every byte; acceptance means buffered, not
    /// durable, and durability is deferred to [`FramedSink::close`].
    ///
    /// # Errors
    ///
    /// Any I/O or compressor error, a short write, or writing after close.
    pub fn write(&mut self, buf: &[u8]) -> SinkResult<()> {
        match &mut self.inner {
            Inner::Plain(file) => write_once(file, buf),
            Inner::Compressed(encoder) => write_retrying(encoder, buf),
            Inner::Closed => Err(SinkError::Closed),
        }
    }

    /// Flushes, finalizes, and syncs the sink, consuming it.
    ///
    /// For a compressed sink this finishes the bzip2 stream (no trailing
    /// block) so the output is a complete, independently decodable unit.
    ///
    /// # Errors
    ///
    /// Any error while finalizing, flushing, or syncing. After an error the
    /// file must not be trusted.
    pub fn close(mut self) -> SinkResult<()> {
        self.close_inner()
    }

    fn close_inner(&mut self) -> SinkResult<()> {
        match mem::replace(&mut self.inner, Inner::Closed) {
            Inner::Plain(mut file) => {
                file.flush()?;
                file.sync_all()?;
            }
            Inner::Compressed(encoder) => {
                let mut file = encoder.finish()?;
                file.flush()?;
                file.sync_all()?;
            }
            Inner::Closed => {}
        }
        Ok(())
    }
}

impl Drop for FramedSink {
    fn drop(&mut self) {
        // Best-effort close for the early-drop path. Cleanliness is
        // signaled by the route lock file, not by reaching this point.
        let _ = self.close_inner();
    }
}

impl std::fmt::Debug for FramedSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.inner {
            Inner::Plain(_) => "plain",
            Inner::Compressed(_) => "compressed",
            Inner::Closed => "closed",
        };
        f.debug_struct("FramedSink")
            .field("path", &self.path)
            .field("kind", &kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bzip2::read::BzDecoder;
    use std::fs;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn plain_sink_writes_bytes_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("qlog");

        let mut sink = FramedSink::open(&path, false).unwrap();
        sink.write(b"hello ").unwrap();
        sink.write(b"world").unwrap();
        sink.close().unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"hello world");
    }

    #[test]
    fn compressed_sink_appends_suffix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rlog");

        let sink = FramedSink::open(&path, true).unwrap();
        assert_eq!(sink.path(), dir.path().join("rlog.bz2"));
        sink.close().unwrap();

        assert!(dir.path().join("rlog.bz2").exists());
        assert!(!path.exists());
    }

    #[test]
    fn compressed_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rlog");

        let payload: Vec<u8> = (0..10_000u32).flat_map(|v| v.to_le_bytes()).collect();

        let mut sink = FramedSink::open(&path, true).unwrap();
        sink.write(&payload).unwrap();
        sink.close().unwrap();

        let mut decoded = Vec::new();
        BzDecoder::new(fs::File::open(dir.path().join("rlog.bz2")).unwrap())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, payload);
    }

    #[test]
    fn open_truncates_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("qlog");
        fs::write(&path, b"stale contents").unwrap();

        let sink = FramedSink::open(&path, false).unwrap();
        sink.close().unwrap();

        assert_eq!(fs::read(&path).unwrap().len(), 0);
    }

    #[test]
    fn dropped_compressed_sink_is_still_decodable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rlog");

        {
            let mut sink = FramedSink::open(&path, true).unwrap();
            sink.write(b"left behind by a crash").unwrap();
            // Dropped without close.
        }

        let mut decoded = Vec::new();
        BzDecoder::new(fs::File::open(dir.path().join("rlog.bz2")).unwrap())
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, b"left behind by a crash");
    }

    #[test]
    fn write_after_close_path_is_unreachable() {
        // `close` consumes the sink, so the Closed variant is only
        // observable through the drop path; exercise it via close_inner.
        let dir = tempdir().unwrap();
        let mut sink = FramedSink::open(&dir.path().join("qlog"), false).unwrap();
        sink.close_inner().unwrap();
        let err = sink.write(b"late").unwrap_err();
        assert!(matches!(err, SinkError::Closed));
    }
}
