//! Native-side half of the gangway event bridge.
//!
//! A [`HostBridge`] is declared up front through [`HostOptions`]: event
//! listeners keyed by id, native functions callable from the page by
//! name, initialisation data and user scripts. Page-originated messages
//! enter through [`HostBridge::handle_message`]; host-originated events
//! leave through a [`PageSink`].
//!
//! [`LoopbackHost`] closes the loop in-process for tests and headless
//! embedders: it implements the page's host boundary on top of a
//! bridge, queueing host→page deliveries until [`pump`]ed.

mod bridge;
mod error;
mod functions;
mod loopback;
mod options;
mod sink;

pub use bridge::HostBridge;
pub use error::{HostError, Result};
pub use functions::{Completion, NativeFunction};
pub use loopback::{connect, pump, LoopbackHost};
pub use options::{HostOptions, NativeEventCallback};
pub use sink::{ChannelSink, NullSink, PageSink, RecordingSink};
