use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use winit::event_loop::EventLoopProxy;

/// Side effect that makes a blocked host event loop return from its wait.
///
/// Called from the render thread, at most once per empty → non-empty edge of
/// the outbound queue.
pub trait WakeSignal: Send + Sync {
    fn wake(&self);
}

impl<W: WakeSignal + ?Sized> WakeSignal for Arc<W> {
    fn wake(&self) {
        (**self).wake();
    }
}

/// Wake signal backed by a channel of tokens.
///
/// Used by headless hosts that block on [`WakeReceiver::wait`] instead of a
/// windowing event loop.
#[derive(Debug, Clone)]
pub struct ChannelWake {
    tx: Sender<()>,
}

/// Host side of a [`ChannelWake`].
#[derive(Debug, Clone)]
pub struct WakeReceiver {
    rx: Receiver<()>,
}

impl ChannelWake {
    pub fn new() -> (ChannelWake, WakeReceiver) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (ChannelWake { tx }, WakeReceiver { rx })
    }
}

impl WakeSignal for ChannelWake {
    fn wake(&self) {
        match self.tx.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Disconnected(())) => {
                log::trace!("wake dropped: host receiver is gone");
            }
            Err(TrySendError::Full(())) => {}
        }
    }
}

impl WakeReceiver {
    /// Blocks until a wake arrives. Returns `false` once every sender is gone.
    pub fn wait(&self) -> bool {
        self.rx.recv().is_ok()
    }

    /// Blocks until a wake arrives or `timeout` elapses.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.rx.recv_timeout(timeout).is_ok()
    }

    /// Consumes a pending wake without blocking.
    pub fn try_wait(&self) -> bool {
        self.rx.try_recv().is_ok()
    }

    /// Number of wakes delivered but not yet consumed.
    pub fn pending_wakes(&self) -> usize {
        self.rx.len()
    }
}

/// Wake signal that injects a user event into a winit event loop.
pub struct ProxyWake<T: 'static> {
    proxy: Mutex<EventLoopProxy<T>>,
    event: T,
}

impl<T: Clone + Send + 'static> ProxyWake<T> {
    pub fn new(proxy: EventLoopProxy<T>, event: T) -> Self {
        Self {
            proxy: Mutex::new(proxy),
            event,
        }
    }
}

impl<T> WakeSignal for ProxyWake<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn wake(&self) {
        if self.proxy.lock().send_event(self.event.clone()).is_err() {
            // The event loop has exited; nobody is left to drain.
            log::debug!("wake dropped: event loop closed");
        }
    }
}
