use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::message::Command;
use crate::queue::ConcurrentQueue;

use super::EngineState;

/// State shared between the engine handle, command senders and the render thread.
///
/// The inbound queue and the flags below are the only things touched from more
/// than one thread; the backend and the view never leave the render thread.
pub(crate) struct Shared {
    pub(crate) inbound: ConcurrentQueue<Command>,
    keep_running: AtomicBool,
    accepting: AtomicBool,
    state: Mutex<Lifecycle>,
    state_changed: Condvar,
}

struct Lifecycle {
    state: EngineState,
    failure: Option<String>,
}

impl Shared {
    pub(crate) fn new() -> Self {
        Self {
            inbound: ConcurrentQueue::new(),
            keep_running: AtomicBool::new(true),
            accepting: AtomicBool::new(false),
            state: Mutex::new(Lifecycle {
                state: EngineState::Uninitialized,
                failure: None,
            }),
            state_changed: Condvar::new(),
        }
    }

    #[inline]
    pub(crate) fn keep_running(&self) -> bool {
        self.keep_running.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn accepting(&self) -> bool {
        self.accepting.load(Ordering::Acquire)
    }

    pub(crate) fn state(&self) -> EngineState {
        self.state.lock().state
    }

    pub(crate) fn failure(&self) -> Option<String> {
        self.state.lock().failure.clone()
    }

    pub(crate) fn mark_initializing(&self) {
        self.transition(|l| {
            if l.state == EngineState::Uninitialized {
                l.state = EngineState::Initializing;
            }
        });
    }

    /// Handshake, worker side: the backend exists.
    ///
    /// Ignored once the creator gave up waiting (state already `Failed`).
    pub(crate) fn mark_running(&self) -> bool {
        let mut ran = false;
        self.transition(|l| {
            if l.state.is_starting() {
                l.state = EngineState::Running;
                // Under the lock, so a stop racing the handshake cannot be undone.
                self.accepting.store(true, Ordering::Release);
                ran = true;
            }
        });
        ran
    }

    /// Handshake, worker side or timeout: the engine will never run.
    pub(crate) fn mark_failed(&self, reason: String) {
        self.transition(|l| {
            self.accepting.store(false, Ordering::Release);
            self.keep_running.store(false, Ordering::Release);
            if !l.state.is_terminal() {
                l.state = EngineState::Failed;
                l.failure = Some(reason);
            }
        });
    }

    /// Cooperative cancellation. The worker observes it at the top of its loop.
    pub(crate) fn request_stop(&self) {
        self.transition(|l| {
            self.accepting.store(false, Ordering::Release);
            self.keep_running.store(false, Ordering::Release);
            if matches!(l.state, EngineState::Running | EngineState::Initializing) {
                l.state = EngineState::Stopping;
            }
        });
    }

    pub(crate) fn mark_stopped(&self) {
        self.transition(|l| {
            if l.state != EngineState::Failed {
                l.state = EngineState::Stopped;
            }
        });
    }

    /// Handshake, creator side: blocks until the worker leaves the starting
    /// states or `timeout` elapses. Returns the observed state.
    pub(crate) fn wait_started(&self, timeout: Option<Duration>) -> EngineState {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut guard = self.state.lock();

        while guard.state.is_starting() {
            match deadline {
                Some(deadline) => {
                    if self.state_changed.wait_until(&mut guard, deadline).timed_out() {
                        break;
                    }
                }
                None => self.state_changed.wait(&mut guard),
            }
        }

        guard.state
    }

    fn transition<F>(&self, f: F)
    where
        F: FnOnce(&mut Lifecycle),
    {
        let mut guard = self.state.lock();
        let before = guard.state;
        f(&mut guard);
        let after = guard.state;
        drop(guard);

        if before != after {
            log::debug!("render engine: {before} -> {after}");
            self.state_changed.notify_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn handshake_unblocks_waiter() {
        let shared = Arc::new(Shared::new());
        shared.mark_initializing();

        let worker = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(20));
                shared.mark_running();
            })
        };

        assert_eq!(shared.wait_started(None), EngineState::Running);
        assert!(shared.accepting());
        worker.join().unwrap();
    }

    #[test]
    fn wait_times_out_while_initializing() {
        let shared = Shared::new();
        shared.mark_initializing();
        let started = Instant::now();
        assert_eq!(
            shared.wait_started(Some(Duration::from_millis(30))),
            EngineState::Initializing
        );
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn late_running_after_failure_is_ignored() {
        let shared = Shared::new();
        shared.mark_initializing();
        shared.mark_failed("timed out".into());
        assert!(!shared.mark_running());
        assert_eq!(shared.state(), EngineState::Failed);
        assert!(!shared.accepting());
        assert!(!shared.keep_running());
        assert_eq!(shared.failure().as_deref(), Some("timed out"));
    }

    #[test]
    fn stop_path_reaches_stopped() {
        let shared = Shared::new();
        shared.mark_initializing();
        shared.mark_running();
        shared.request_stop();
        assert_eq!(shared.state(), EngineState::Stopping);
        assert!(!shared.accepting());
        shared.mark_stopped();
        assert_eq!(shared.state(), EngineState::Stopped);
    }

    #[test]
    fn failed_is_sticky() {
        let shared = Shared::new();
        shared.mark_initializing();
        shared.mark_running();
        shared.mark_failed("device lost".into());
        shared.mark_stopped();
        assert_eq!(shared.state(), EngineState::Failed);
    }
}
