//! # routelog core
//!
//! Segmented, crash-resilient binary route logger.
//!
//! This crate provides:
//! - [`RouteLogger`]: one recording session (a *route*) split into
//!   numbered segments, each written to a compressed full log and an
//!   uncompressed quick log
//! - [`Segment`]: one numbered unit of a route owning the two channel
//!   sinks
//! - [`IdentifierCache`]: process-lifetime cache over the external
//!   persisted identifier store
//! - [`Config`]: log root, naming, and layout policy
//!
//! ## Crash resilience
//!
//! The logger never repairs a damaged channel in place. Instead it
//! guarantees that channels are always interpretable: every buffer is
//! written as one whole frame, sentinel frames bound routes and segments,
//! and the route's lock file is removed only as the last step of a fully
//! successful [`RouteLogger::close`]. A lock file found next to a route
//! directory means the route is still being written or ended uncleanly.
//!
//! ## Single writer
//!
//! `write` and `advance_segment` take `&mut self` and `close` consumes the
//! logger, so exclusive ownership is the serialization mechanism. Multiple
//! producers must funnel through one owner, typically a dedicated writer
//! thread.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod ident;
pub mod route;
pub mod segment;

pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use ident::{IdentifierCache, IdentifierStore};
pub use route::RouteLogger;
pub use segment::Segment;
