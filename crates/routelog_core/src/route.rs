//! Route lifecycle management.

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::ident::IdentifierCache;
use crate::segment::Segment;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

/// Extension of the route lock file.
const LOCK_EXTENSION: &str = "lock";

/// The logger state for one route.
///
/// A route is one complete recording session. Creating the logger creates
/// the route directory, the lock file, and segment 0; [`write`] records
/// message buffers into the current segment; [`advance_segment`] rotates to
/// the next segment at externally decided boundaries; [`close`] performs
/// the orderly teardown.
///
/// # Crash semantics
///
/// The lock file is created before the first segment and removed only as
/// the final step of a fully successful [`close`]. Dropping the logger
/// without closing it models a crash: sinks finalize best-effort so the
/// channels stay decodable, but the lock file remains, which is the sole
/// durable signal that the route did not end cleanly.
///
/// [`write`]: RouteLogger::write
/// [`advance_segment`]: RouteLogger::advance_segment
/// [`close`]: RouteLogger::close
#[derive(Debug)]
pub struct RouteLogger {
    config: Config,
    route_name: String,
    route_path: PathBuf,
    lock_path: PathBuf,
    lock_file: Option<File>,
    init_payload: Vec<u8>,
    exit_signal: i32,
    part: u64,
    segment_path: PathBuf,
    segment: Option<Segment>,
}

impl RouteLogger {
    /// Creates a route and opens segment 0.
    ///
    /// The route name is derived from the configured identifier keys
    /// (resolved through `identifiers`) joined with a fresh uniqueness
    /// token, unless the configuration fixes a name. `init_payload` is the
    /// pre-built opaque metadata buffer written as the first data frame of
    /// every segment.
    ///
    /// # Errors
    ///
    /// Everything here is fatal: an unresolvable identifier
    /// ([`CoreError::MissingIdentifier`]), a lock file already held by
    /// another writer ([`CoreError::RouteLocked`]), or any I/O failure.
    /// There is no fallback route.
    pub fn create(
        config: Config,
        identifiers: &IdentifierCache,
        init_payload: Vec<u8>,
    ) -> CoreResult<Self> {
        let route_name = build_route_name(&config, identifiers)?;
        let route_path = config.log_root().join(&route_name);
        fs::create_dir_all(&route_path)?;

        let lock_path = config
            .log_root()
            .join(format!("{route_name}.{LOCK_EXTENSION}"));
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        if lock_file.try_lock_exclusive().is_err() {
            return Err(CoreError::RouteLocked);
        }

        let segment = Segment::open(&route_path, 0, &config, &init_payload, true)?;

        info!(route = %route_name, root = %config.log_root().display(), "route created");
        Ok(Self {
            config,
            route_name,
            route_path,
            lock_path,
            lock_file: Some(lock_file),
            init_payload,
            exit_signal: 0,
            part: 0,
            segment_path: segment.path().to_path_buf(),
            segment: Some(segment),
        })
    }

    /// Writes one message buffer into the current segment.
    ///
    /// The buffer always lands in the full log and additionally in the
    /// quick log iff `to_quick_log` is set.
    ///
    /// # Errors
    ///
    /// [`CoreError::EmptyMessage`] for an empty buffer,
    /// [`CoreError::RouteClosed`] once the logger was invalidated by a
    /// failed advance, and any fatal sink error.
    pub fn write(&mut self, message: &[u8], to_quick_log: bool) -> CoreResult<()> {
        if message.is_empty() {
            return Err(CoreError::EmptyMessage);
        }
        let segment = self.segment.as_mut().ok_or(CoreError::RouteClosed)?;
        segment.write_message(message, to_quick_log)
    }

    /// Closes the current segment and opens the next one.
    ///
    /// The outgoing segment gets a segment-end sentinel; the incoming one
    /// starts with a segment-start sentinel followed by the same cached
    /// init payload, and the segment counter advances by exactly one.
    ///
    /// # Errors
    ///
    /// Any failure leaves the logger permanently unusable (subsequent
    /// operations return [`CoreError::RouteClosed`]) and the lock file in
    /// place; partial-segment damage cannot be repaired locally.
    pub fn advance_segment(&mut self) -> CoreResult<()> {
        let segment = self.segment.take().ok_or(CoreError::RouteClosed)?;
        if let Err(e) = segment.close(None) {
            warn!(route = %self.route_name, part = self.part, "segment close failed; route invalidated");
            return Err(e);
        }

        let next = self.part + 1;
        let segment = Segment::open(&self.route_path, next, &self.config, &self.init_payload, false)?;
        self.part = next;
        self.segment_path = segment.path().to_path_buf();
        self.segment = Some(segment);
        Ok(())
    }

    /// Records the exit signal embedded in the eventual route-end
    /// sentinel. May be called repeatedly; the last value wins.
    pub fn record_exit_signal(&mut self, signal: i32) {
        self.exit_signal = signal;
    }

    /// Returns the current segment index.
    #[must_use]
    pub fn segment_index(&self) -> u64 {
        self.part
    }

    /// Returns the directory of the current (or last open) segment.
    #[must_use]
    pub fn segment_path(&self) -> &Path {
        &self.segment_path
    }

    /// Returns the route name.
    #[must_use]
    pub fn route_name(&self) -> &str {
        &self.route_name
    }

    /// Returns the route directory.
    #[must_use]
    pub fn route_path(&self) -> &Path {
        &self.route_path
    }

    /// Returns the lock file path.
    #[must_use]
    pub fn lock_path(&self) -> &Path {
        &self.lock_path
    }

    /// Performs the orderly teardown, consuming the logger.
    ///
    /// The current segment is closed as the terminal one: a route-end
    /// sentinel carrying the recorded exit signal (0 if none was recorded)
    /// goes to both channels, both sinks flush and finalize, and only then
    /// is the lock file removed. Lock-file absence is the durable proof of
    /// clean shutdown.
    ///
    /// # Errors
    ///
    /// If the segment fails to close, the lock file is deliberately left
    /// behind and the error is returned; the route must then be treated as
    /// unclean by readers.
    pub fn close(mut self) -> CoreResult<()> {
        let segment = self.segment.take().ok_or(CoreError::RouteClosed)?;
        if let Err(e) = segment.close(Some(self.exit_signal)) {
            warn!(route = %self.route_name, "teardown failed; lock file left in place");
            return Err(e);
        }

        // Release the advisory lock before removing the marker.
        drop(self.lock_file.take());
        fs::remove_file(&self.lock_path)?;

        info!(route = %self.route_name, exit_signal = self.exit_signal, "route closed cleanly");
        Ok(())
    }
}

impl Drop for RouteLogger {
    fn drop(&mut self) {
        if self.segment.is_some() {
            // Crash path: sinks close best-effort via their own drops, the
            // lock file stays behind to mark the route unclean.
            warn!(route = %self.route_name, "route dropped without close; lock file remains");
        }
    }
}

/// Derives the route name from configuration and resolved identifiers.
fn build_route_name(config: &Config, identifiers: &IdentifierCache) -> CoreResult<String> {
    if let Some(name) = &config.route_name {
        return Ok(name.clone());
    }

    let token = Uuid::new_v4().simple().to_string();
    let mut parts = Vec::with_capacity(config.identifier_keys.len());
    for key in &config.identifier_keys {
        let value = identifiers
            .get(key)?
            .ok_or_else(|| CoreError::missing_identifier(key.as_str()))?;
        parts.push(value);
    }

    if parts.is_empty() {
        Ok(token)
    } else {
        Ok(format!("{}--{token}", parts.join("-")))
    }
}
