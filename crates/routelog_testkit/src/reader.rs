//! Linear channel reader.
//!
//! Reads a channel file back as a sequence of frames, transparently
//! decompressing `.bz2` full logs. A truncated envelope (mid-header or
//! mid-payload end of file) is reported as an error, which is exactly the
//! signal a crashed route leaves behind.

use bzip2::read::BzDecoder;
use routelog_codec::{FrameTag, LEN_SIZE};
use routelog_sink::COMPRESSED_SUFFIX;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// One decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The frame tag.
    pub tag: FrameTag,
    /// The frame payload bytes.
    pub payload: Vec<u8>,
}

impl Frame {
    /// Returns true for data frames.
    #[must_use]
    pub fn is_data(&self) -> bool {
        !self.tag.is_sentinel()
    }

    /// Decodes the exit code of a sentinel frame.
    ///
    /// Returns `None` for data frames or malformed sentinel payloads.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        if !self.tag.is_sentinel() {
            return None;
        }
        let bytes: [u8; 4] = self.payload.as_slice().try_into().ok()?;
        Some(i32::from_le_bytes(bytes))
    }
}

/// Reader yielding frames from one channel file.
///
/// Compression is selected by file extension, matching the sink's naming:
/// a path ending in `.bz2` streams through a bzip2 decoder.
pub struct FrameReader {
    reader: Box<dyn Read>,
}

impl FrameReader {
    /// Opens a channel file for reading.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let compressed = path.to_string_lossy().ends_with(COMPRESSED_SUFFIX);

        let file = BufReader::with_capacity(32 * 1024, File::open(path)?);
        let reader: Box<dyn Read> = if compressed {
            Box::new(BzDecoder::new(file))
        } else {
            Box::new(file)
        };

        Ok(Self { reader })
    }

    /// Reads the next frame.
    ///
    /// Returns `None` at a clean end of stream and an error on a truncated
    /// envelope or an unknown tag.
    pub fn read_frame(&mut self) -> io::Result<Option<Frame>> {
        let mut tag_byte = [0u8; 1];
        match self.reader.read_exact(&mut tag_byte) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        }

        let tag = FrameTag::from_byte(tag_byte[0]).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("unknown frame tag: {:#04x}", tag_byte[0]),
            )
        })?;

        let mut len_bytes = [0u8; LEN_SIZE];
        self.reader.read_exact(&mut len_bytes)?;
        let len = u32::from_le_bytes(len_bytes) as usize;

        let mut payload = vec![0u8; len];
        self.reader.read_exact(&mut payload)?;

        Ok(Some(Frame { tag, payload }))
    }

    /// Reads all remaining frames.
    pub fn read_all(&mut self) -> io::Result<Vec<Frame>> {
        let mut frames = Vec::new();
        while let Some(frame) = self.read_frame()? {
            frames.push(frame);
        }
        Ok(frames)
    }
}

/// Reads an entire channel file as frames.
pub fn read_channel(path: impl AsRef<Path>) -> io::Result<Vec<Frame>> {
    FrameReader::open(path)?.read_all()
}
