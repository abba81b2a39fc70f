use std::fmt;
use std::sync::Arc;

use crate::bridge::WakeSignal;

/// Asks a host event loop to stop the engine and return.
///
/// Cloneable and usable from any thread. Requests after the host has exited
/// are ignored.
#[derive(Clone)]
pub struct ShutdownHandle {
    request: Arc<dyn Fn() + Send + Sync>,
}

impl ShutdownHandle {
    pub(crate) fn new<F>(request: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            request: Arc::new(request),
        }
    }

    /// Handle whose request fires `signal`, e.g. a [`ProxyWake`](crate::bridge::ProxyWake)
    /// carrying a shutdown event.
    pub fn from_signal<W>(signal: W) -> Self
    where
        W: WakeSignal + 'static,
    {
        Self::new(move || signal.wake())
    }

    pub fn request(&self) {
        (self.request)();
    }
}

impl fmt::Debug for ShutdownHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShutdownHandle")
    }
}
