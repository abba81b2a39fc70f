//! Host notification bridge.
//!
//! Carries [`Notification`]s from the render thread to a host-controlled event
//! loop without polling. The host is woken only on the empty → non-empty edge
//! of the outbound queue; one wake may therefore stand for a burst of
//! notifications, and the host must drain to empty every time it wakes.

mod wake;

use std::sync::atomic::{AtomicIsize, Ordering};

use crate::message::Notification;
use crate::queue::ConcurrentQueue;

pub use wake::{ChannelWake, ProxyWake, WakeReceiver, WakeSignal};

/// Outbound queue plus edge-triggered wake signal.
///
/// `pending` shadows the queue length. Producers push first and count second,
/// so the host may pop an item before its producer has counted it and the
/// counter can dip below zero for a moment. Once every in-flight `post`
/// completes it equals the queue length again, and the increment that takes it
/// from 0 to 1 is the one that wakes the host.
pub struct HostBridge<W: WakeSignal> {
    queue: ConcurrentQueue<Notification>,
    pending: AtomicIsize,
    waker: W,
}

impl<W: WakeSignal> HostBridge<W> {
    pub fn new(waker: W) -> Self {
        Self {
            queue: ConcurrentQueue::new(),
            pending: AtomicIsize::new(0),
            waker,
        }
    }

    /// Queues `notification`, waking the host if the queue was empty.
    pub fn post(&self, notification: Notification) {
        self.queue.push(notification);

        if self.pending.fetch_add(1, Ordering::AcqRel) == 0 {
            self.waker.wake();
        }
    }

    /// Pops one notification. Call in a loop until `None` after each wake.
    pub fn try_pop(&self) -> Option<Notification> {
        let item = self.queue.try_pop()?;
        self.pending.fetch_sub(1, Ordering::AcqRel);
        Some(item)
    }

    /// Pops until the queue is empty, handing each notification to `f`.
    ///
    /// Returns the number of notifications drained.
    pub fn drain<F>(&self, mut f: F) -> usize
    where
        F: FnMut(Notification),
    {
        let mut n = 0;
        while let Some(item) = self.try_pop() {
            f(item);
            n += 1;
        }
        n
    }

    /// Diagnostic snapshot of the pending counter.
    pub fn pending(&self) -> isize {
        self.pending.load(Ordering::Acquire)
    }

    pub fn waker(&self) -> &W {
        &self.waker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;

    #[derive(Default)]
    struct CountingWake(AtomicUsize);

    impl WakeSignal for CountingWake {
        fn wake(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl CountingWake {
        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[test]
    fn burst_before_drain_wakes_once() {
        let bridge = HostBridge::new(CountingWake::default());
        bridge.post(Notification::log("a"));
        bridge.post(Notification::log("b"));
        bridge.post(Notification::log("c"));
        assert_eq!(bridge.waker().count(), 1);
        assert_eq!(bridge.pending(), 3);

        let mut seen = Vec::new();
        assert_eq!(bridge.drain(|n| seen.push(n.text.to_string())), 3);
        assert_eq!(seen, ["a", "b", "c"]);
        assert_eq!(bridge.pending(), 0);
    }

    #[test]
    fn each_drain_re_arms_the_edge() {
        let bridge = HostBridge::new(CountingWake::default());
        for round in 1..=4 {
            bridge.post(Notification::log("x"));
            bridge.post(Notification::log("y"));
            assert_eq!(bridge.waker().count(), round);
            assert_eq!(bridge.drain(|_| {}), 2);
        }
    }

    #[test]
    fn partial_pop_does_not_rewake() {
        let bridge = HostBridge::new(CountingWake::default());
        bridge.post(Notification::log("a"));
        bridge.post(Notification::log("b"));
        assert!(bridge.try_pop().is_some());
        // Still non-empty: the host already knows, no second wake.
        bridge.post(Notification::log("c"));
        assert_eq!(bridge.waker().count(), 1);
        assert_eq!(bridge.drain(|_| {}), 2);
    }

    #[test]
    fn empty_pop_leaves_counter_alone() {
        let bridge = HostBridge::new(CountingWake::default());
        assert!(bridge.try_pop().is_none());
        assert_eq!(bridge.pending(), 0);
        assert_eq!(bridge.waker().count(), 0);
    }

    #[test]
    fn concurrent_posts_are_never_stranded() {
        let (wake, rx) = ChannelWake::new();
        let bridge = Arc::new(HostBridge::new(wake));
        const PER_PRODUCER: usize = 2_000;

        let producers: Vec<_> = (0..3)
            .map(|_| {
                let bridge = Arc::clone(&bridge);
                thread::spawn(move || {
                    for _ in 0..PER_PRODUCER {
                        bridge.post(Notification::log("tick"));
                    }
                })
            })
            .collect();

        let mut received = 0;
        while received < 3 * PER_PRODUCER {
            assert!(
                rx.wait_timeout(std::time::Duration::from_secs(5)),
                "host starved with {received} notifications received"
            );
            received += bridge.drain(|_| {});
        }

        for h in producers {
            h.join().unwrap();
        }
        assert_eq!(bridge.drain(|_| {}), 0);
        assert_eq!(bridge.pending(), 0);
    }
}
