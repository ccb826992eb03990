//! Explicit attachment point between page code and the host.

use std::sync::Arc;

use gangway_wire::InitData;

use crate::backend::Backend;
use crate::transport::{HostObject, StubHost};

/// The page end of the bridge: the host boundary, the initialisation
/// data the host injected, and the [`Backend`] built over both.
///
/// A `Page` is constructed explicitly and passed where needed. There is
/// no process-wide attachment point and no hidden global state; two
/// pages in one process are fully independent.
pub struct Page {
    host: Arc<dyn HostObject>,
    init: InitData,
    backend: Backend,
    bootstrap_done: bool,
}

impl Page {
    /// Attach to `host`, taking a snapshot of its initialisation data
    /// (or defaults when it provides none).
    pub fn attached(host: Arc<dyn HostObject>) -> Self {
        let init = host.initialisation_data().unwrap_or_default();
        let backend = Backend::new(Arc::clone(&host));
        Self {
            host,
            init,
            backend,
            bootstrap_done: false,
        }
    }

    /// Build a page with no real host behind it.
    ///
    /// A [`StubHost`] discards outbound events so page code keeps
    /// working; initialisation data is empty and there is no bootstrap.
    pub fn detached() -> Self {
        tracing::warn!("No native host present, outbound events will be discarded");
        Self::attached(Arc::new(StubHost))
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut Backend {
        &mut self.backend
    }

    /// Initialisation data snapshot taken at attach time.
    pub fn initialisation_data(&self) -> &InitData {
        &self.init
    }

    /// Fetch the host's platform bootstrap source and hand it to
    /// `execute`, at most once for the life of the page.
    ///
    /// The once-guard is set before `execute` runs, so the bootstrap
    /// stays spent even if execution panics.
    pub fn run_platform_bootstrap<F>(&mut self, execute: F)
    where
        F: FnOnce(&str),
    {
        if self.bootstrap_done {
            tracing::trace!("Platform bootstrap already ran, skipping");
            return;
        }
        self.bootstrap_done = true;
        match self.host.platform_bootstrap() {
            Some(source) => {
                tracing::debug!(bytes = source.len(), "Executing platform bootstrap");
                execute(&source);
            }
            None => tracing::debug!("Host ships no platform bootstrap"),
        }
    }
}
