//! Embedded-side half of the gangway event bridge.
//!
//! Page code talks to its native host exclusively through a [`Backend`]:
//! listeners subscribe to host-originated events by id, and outbound
//! events cross the boundary as serialized envelopes handed to the
//! host's send primitive. A [`Page`] owns the backend together with the
//! host boundary and the initialisation data the host injected, and runs
//! the platform bootstrap at most once.
//!
//! The boundary itself is the [`HostObject`] trait. [`StubHost`] keeps
//! unhosted pages working, [`RecordingHost`] captures traffic for tests,
//! and [`ChannelHost`] hands outbound envelopes to a channel for
//! embedders that drain them elsewhere.

mod backend;
mod calls;
mod error;
mod listener;
mod page;
mod registry;
mod transport;

pub use backend::Backend;
pub use calls::{FunctionProxy, ResultCallback};
pub use error::{BridgeError, Result};
pub use listener::{EventCallback, ListenerId, ListenerList};
pub use page::Page;
pub use registry::{EventListenerList, Subscription};
pub use transport::{ChannelHost, HostObject, RecordingHost, StubHost};
