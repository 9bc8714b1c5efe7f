//! One numbered unit of a route.

use crate::config::Config;
use crate::error::CoreResult;
use routelog_codec::{encode_data, encode_sentinel, SentinelKind};
use routelog_sink::FramedSink;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One segment of a route: a directory holding the two channel sinks.
///
/// Segments are created by [`crate::RouteLogger`] and exist one at a time
/// per logger. Opening a segment writes its head frames (route-start for
/// segment 0, segment-start, then the init payload) to both channels;
/// closing writes the tail sentinel and tears both sinks down.
#[derive(Debug)]
pub struct Segment {
    index: u64,
    path: PathBuf,
    full: FramedSink,
    quick: FramedSink,
}

impl Segment {
    /// Creates the segment directory and opens both channel sinks.
    ///
    /// Writes the head frames to both channels: the route-start sentinel
    /// when `route_start` is set (segment 0 only), the segment-start
    /// sentinel, and `init_payload` as a data frame.
    ///
    /// # Errors
    ///
    /// Any directory, sink, or write failure. A partially opened segment
    /// is dropped; its sinks close best-effort.
    pub fn open(
        route_path: &Path,
        index: u64,
        config: &Config,
        init_payload: &[u8],
        route_start: bool,
    ) -> CoreResult<Self> {
        let path = route_path.join(config.format_index(index));
        fs::create_dir_all(&path)?;

        let full = FramedSink::open(&path.join(&config.full_log_name), true)?;
        let quick = FramedSink::open(&path.join(&config.quick_log_name), false)?;

        let mut segment = Self {
            index,
            path,
            full,
            quick,
        };

        if route_start {
            segment.write_both(&encode_sentinel(SentinelKind::RouteStart, 0))?;
        }
        segment.write_both(&encode_sentinel(SentinelKind::SegmentStart, 0))?;
        segment.write_both(&encode_data(init_payload)?)?;

        debug!(index, path = %segment.path.display(), "segment opened");
        Ok(segment)
    }

    /// Returns the segment index.
    #[must_use]
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns the segment directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes one message as a single data frame.
    ///
    /// The frame always goes to the full log; it additionally goes to the
    /// quick log iff `to_quick_log` is set, so bulky high-rate message
    /// types can be confined to the full log while a curated subset stays
    /// cheap to read back.
    pub fn write_message(&mut self, payload: &[u8], to_quick_log: bool) -> CoreResult<()> {
        let frame = encode_data(payload)?;
        self.full.write(&frame)?;
        if to_quick_log {
            self.quick.write(&frame)?;
        }
        Ok(())
    }

    /// Writes the tail sentinel and closes both sinks, consuming the
    /// segment.
    ///
    /// A terminal segment passes `route_end = Some(exit_code)` and gets a
    /// route-end sentinel carrying the code; otherwise a segment-end
    /// sentinel is written. Both sinks must close successfully.
    pub fn close(mut self, route_end: Option<i32>) -> CoreResult<()> {
        let sentinel = match route_end {
            Some(code) => encode_sentinel(SentinelKind::RouteEnd, code),
            None => encode_sentinel(SentinelKind::SegmentEnd, 0),
        };
        self.write_both(&sentinel)?;

        let index = self.index;
        let Self { full, quick, .. } = self;
        full.close()?;
        quick.close()?;

        debug!(index, terminal = route_end.is_some(), "segment closed");
        Ok(())
    }

    fn write_both(&mut self, frame: &[u8]) -> CoreResult<()> {
        self.full.write(frame)?;
        self.quick.write(frame)?;
        Ok(())
    }
}
